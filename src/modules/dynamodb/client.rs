//! DynamoDB client backed by the AWS SDK
//!
//! Works against DynamoDB Local as well as the managed service: the endpoint,
//! region and static credentials all come from `DynamoDbConfig`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, GlobalSecondaryIndex, IndexStatus, KeySchemaElement, KeyType, Projection,
    ProjectionType, ProvisionedThroughput, ScalarAttributeType, Select, TableDescription,
    TableStatus,
};
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

use super::attribute_value::{AttributeValue, Item};
use super::model::{Capacity, IndexCountQuery, IndexProjection, TableDefinition};
use super::store::TableStore;
use crate::core::config::DynamoDbConfig;
use crate::core::error::{AppError, Result, StoreError};

const CREDENTIALS_PROVIDER: &str = "incident-seeder-env";

pub struct DynamoDbClient {
    client: Client,
    table_wait_interval: Duration,
    table_wait_max_attempts: u32,
}

impl DynamoDbClient {
    pub async fn new(config: &DynamoDbConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None, // session token
            None, // expiry
            CREDENTIALS_PROVIDER,
        );
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(config.request_timeout)
            .build();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.endpoint)
            .timeout_config(timeouts)
            .load()
            .await;

        info!(
            "DynamoDB client initialized for endpoint: {}, region: {}",
            config.endpoint, config.region
        );

        Self {
            client: Client::new(&sdk_config),
            table_wait_interval: config.table_wait_interval,
            table_wait_max_attempts: config.table_wait_max_attempts,
        }
    }
}

#[async_trait]
impl TableStore for DynamoDbClient {
    async fn create_table(&self, definition: &TableDefinition) -> Result<()> {
        let mut request = self
            .client
            .create_table()
            .table_name(&definition.table_name)
            .set_key_schema(Some(key_schema(
                &definition.hash_key,
                definition.range_key.as_deref(),
            )?))
            .set_attribute_definitions(Some(attribute_definitions(definition)?))
            .provisioned_throughput(throughput(definition.capacity)?);

        if !definition.indexes.is_empty() {
            request = request.set_global_secondary_indexes(Some(global_secondary_indexes(
                definition,
            )?));
        }

        request.send().await.map_err(store_error)?;
        Ok(())
    }

    async fn wait_until_exists(&self, table_name: &str) -> Result<()> {
        for attempt in 1..=self.table_wait_max_attempts {
            match self.client.describe_table().table_name(table_name).send().await {
                Ok(output) if output.table().is_some_and(table_is_active) => return Ok(()),
                Ok(_) => debug!(
                    "Table '{}' not active yet (attempt {}/{})",
                    table_name, attempt, self.table_wait_max_attempts
                ),
                Err(e) => {
                    let err = store_error(e);
                    if !err.is_resource_not_found() {
                        return Err(err);
                    }
                    debug!(
                        "Table '{}' not visible yet (attempt {}/{})",
                        table_name, attempt, self.table_wait_max_attempts
                    );
                }
            }
            tokio::time::sleep(self.table_wait_interval).await;
        }

        Err(AppError::Internal(format!(
            "Table '{}' did not become active after {} attempts",
            table_name, self.table_wait_max_attempts
        )))
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await
            .map_err(store_error)?;
        Ok(output.item().cloned())
    }

    async fn update_attribute(
        &self,
        table_name: &str,
        key: Item,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<()> {
        self.client
            .update_item()
            .table_name(table_name)
            .set_key(Some(key))
            .update_expression("SET #attr = :value")
            .expression_attribute_names("#attr", attribute)
            .expression_attribute_values(":value", value)
            .send()
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn scan(&self, table_name: &str, projection: Option<&[&str]>) -> Result<Vec<Item>> {
        let (expression, names) = match projection.filter(|p| !p.is_empty()) {
            Some(attributes) => {
                let (expression, names) = projection_expression(attributes);
                (Some(expression), Some(names))
            }
            None => (None, None),
        };

        let mut pages = self
            .client
            .scan()
            .table_name(table_name)
            .set_projection_expression(expression)
            .set_expression_attribute_names(names)
            .into_paginator()
            .send();

        let mut items = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(store_error)?;
            items.extend(page.items().iter().cloned());
        }

        debug!("Scanned {} items from '{}'", items.len(), table_name);
        Ok(items)
    }

    async fn query_count(&self, query: &IndexCountQuery) -> Result<usize> {
        let expression = count_expression(query);

        let mut pages = self
            .client
            .query()
            .table_name(&query.table_name)
            .index_name(&query.index_name)
            .key_condition_expression(expression.key_condition)
            .set_filter_expression(expression.filter)
            .set_expression_attribute_names(Some(expression.names))
            .set_expression_attribute_values(Some(expression.values))
            .select(Select::Count)
            .into_paginator()
            .send();

        let mut total = 0;
        while let Some(page) = pages.next().await {
            let page = page.map_err(store_error)?;
            total += usize::try_from(page.count()).unwrap_or(0);
        }
        Ok(total)
    }
}

/// Service errors keep their code; anything that never reached the service
/// (dispatch, timeout, unreadable response) becomes `AppError::Sdk`.
fn store_error<E, R>(err: SdkError<E, R>) -> AppError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    match err.code() {
        Some(code) => StoreError::new(code, err.message().unwrap_or_default()).into(),
        None => AppError::Sdk(DisplayErrorContext(&err).to_string()),
    }
}

fn table_is_active(table: &TableDescription) -> bool {
    table.table_status() == Some(&TableStatus::Active)
        && table
            .global_secondary_indexes()
            .iter()
            .all(|gsi| gsi.index_status().map_or(true, |s| *s == IndexStatus::Active))
}

fn key_schema(hash_key: &str, range_key: Option<&str>) -> Result<Vec<KeySchemaElement>> {
    let mut schema = vec![KeySchemaElement::builder()
        .attribute_name(hash_key)
        .key_type(KeyType::Hash)
        .build()?];
    if let Some(range_key) = range_key {
        schema.push(
            KeySchemaElement::builder()
                .attribute_name(range_key)
                .key_type(KeyType::Range)
                .build()?,
        );
    }
    Ok(schema)
}

fn attribute_definitions(definition: &TableDefinition) -> Result<Vec<AttributeDefinition>> {
    let mut definitions = Vec::new();
    for name in definition.key_attribute_names() {
        definitions.push(
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        );
    }
    Ok(definitions)
}

fn throughput(capacity: Capacity) -> Result<ProvisionedThroughput> {
    Ok(ProvisionedThroughput::builder()
        .read_capacity_units(capacity.read)
        .write_capacity_units(capacity.write)
        .build()?)
}

fn global_secondary_indexes(definition: &TableDefinition) -> Result<Vec<GlobalSecondaryIndex>> {
    let mut indexes = Vec::new();
    for index in &definition.indexes {
        let projection = match &index.projection {
            IndexProjection::All => Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
            IndexProjection::Include(attributes) => Projection::builder()
                .projection_type(ProjectionType::Include)
                .set_non_key_attributes(Some(attributes.clone()))
                .build(),
        };

        indexes.push(
            GlobalSecondaryIndex::builder()
                .index_name(&index.index_name)
                .set_key_schema(Some(key_schema(
                    &index.hash_key,
                    index.range_key.as_deref(),
                )?))
                .projection(projection)
                .provisioned_throughput(throughput(index.capacity)?)
                .build()?,
        );
    }
    Ok(indexes)
}

/// `#p0, #p1, ...` placeholders keep reserved words like `status` usable
fn projection_expression(attributes: &[&str]) -> (String, HashMap<String, String>) {
    let names: HashMap<String, String> = attributes
        .iter()
        .enumerate()
        .map(|(i, attribute)| (format!("#p{}", i), attribute.to_string()))
        .collect();
    let expression = (0..attributes.len())
        .map(|i| format!("#p{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    (expression, names)
}

struct CountExpression {
    key_condition: String,
    filter: Option<String>,
    names: HashMap<String, String>,
    values: Item,
}

fn count_expression(query: &IndexCountQuery) -> CountExpression {
    let mut names = HashMap::from([("#k".to_string(), query.key_attribute.clone())]);
    let mut values = HashMap::from([(":k".to_string(), query.key_value.clone())]);

    let filter = query.filter.as_ref().map(|(attribute, value)| {
        names.insert("#f".to_string(), attribute.clone());
        values.insert(":f".to_string(), value.clone());
        "#f = :f".to_string()
    });

    CountExpression {
        key_condition: "#k = :k".to_string(),
        filter,
        names,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::dynamodb::attribute_value::s;
    use crate::modules::dynamodb::model::IndexDefinition;
    use aws_sdk_dynamodb::types::GlobalSecondaryIndexDescription;

    fn config(endpoint: &str) -> DynamoDbConfig {
        DynamoDbConfig {
            endpoint: endpoint.to_string(),
            region: "ap-southeast-1".to_string(),
            access_key: "local".to_string(),
            secret_key: "local".to_string(),
            table_wait_interval: Duration::from_millis(10),
            table_wait_max_attempts: 2,
            request_timeout: Duration::from_secs(1),
        }
    }

    fn report_table() -> TableDefinition {
        TableDefinition {
            table_name: "Report".to_string(),
            hash_key: "report_id".to_string(),
            range_key: None,
            capacity: Capacity::new(10, 10),
            indexes: vec![IndexDefinition {
                index_name: "StatusIndex".to_string(),
                hash_key: "status".to_string(),
                range_key: None,
                projection: IndexProjection::Include(vec!["department".to_string()]),
                capacity: Capacity::new(5, 5),
            }],
        }
    }

    #[tokio::test]
    async fn test_client_uses_configured_region() {
        let client = DynamoDbClient::new(&config("http://localhost:8000")).await;
        assert_eq!(
            client.client.config().region(),
            Some(&Region::new("ap-southeast-1"))
        );
        assert_eq!(client.table_wait_max_attempts, 2);
    }

    #[test]
    fn test_key_schema_hash_then_range() {
        let schema = key_schema("report_id", Some("createdAt")).unwrap();
        let expected = vec![
            KeySchemaElement::builder()
                .attribute_name("report_id")
                .key_type(KeyType::Hash)
                .build()
                .unwrap(),
            KeySchemaElement::builder()
                .attribute_name("createdAt")
                .key_type(KeyType::Range)
                .build()
                .unwrap(),
        ];
        assert_eq!(schema, expected);
        assert_eq!(key_schema("report_id", None).unwrap().len(), 1);
    }

    #[test]
    fn test_attribute_definitions_cover_index_keys() {
        let definitions = attribute_definitions(&report_table()).unwrap();
        let expected: Vec<AttributeDefinition> = ["report_id", "status"]
            .into_iter()
            .map(|name| {
                AttributeDefinition::builder()
                    .attribute_name(name)
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap()
            })
            .collect();
        assert_eq!(definitions, expected);
    }

    #[test]
    fn test_include_projection_lists_attributes() {
        let indexes = global_secondary_indexes(&report_table()).unwrap();
        assert_eq!(indexes.len(), 1);

        let expected = GlobalSecondaryIndex::builder()
            .index_name("StatusIndex")
            .set_key_schema(Some(key_schema("status", None).unwrap()))
            .projection(
                Projection::builder()
                    .projection_type(ProjectionType::Include)
                    .non_key_attributes("department")
                    .build(),
            )
            .provisioned_throughput(throughput(Capacity::new(5, 5)).unwrap())
            .build()
            .unwrap();
        assert_eq!(indexes[0], expected);
    }

    #[test]
    fn test_projection_expression_uses_placeholders() {
        let (expression, names) = projection_expression(&["report_id", "status"]);
        assert_eq!(expression, "#p0, #p1");
        assert_eq!(names["#p0"], "report_id");
        assert_eq!(names["#p1"], "status");
    }

    #[test]
    fn test_count_expression() {
        let query = IndexCountQuery {
            table_name: "Report".to_string(),
            index_name: "StatusIndex".to_string(),
            key_attribute: "status".to_string(),
            key_value: s("Ack"),
            filter: Some(("department".to_string(), s("HR"))),
        };
        let expression = count_expression(&query);

        assert_eq!(expression.key_condition, "#k = :k");
        assert_eq!(expression.filter.as_deref(), Some("#f = :f"));
        assert_eq!(expression.names["#k"], "status");
        assert_eq!(expression.names["#f"], "department");
        assert_eq!(expression.values[":f"], s("HR"));

        let unfiltered = count_expression(&IndexCountQuery {
            filter: None,
            ..query
        });
        assert!(unfiltered.filter.is_none());
        assert_eq!(unfiltered.names.len(), 1);
    }

    #[test]
    fn test_table_is_active_waits_for_indexes() {
        let creating = TableDescription::builder()
            .table_status(TableStatus::Active)
            .global_secondary_indexes(
                GlobalSecondaryIndexDescription::builder()
                    .index_name("StatusIndex")
                    .index_status(IndexStatus::Creating)
                    .build(),
            )
            .build();
        assert!(!table_is_active(&creating));

        let active = TableDescription::builder()
            .table_status(TableStatus::Active)
            .build();
        assert!(table_is_active(&active));

        let pending = TableDescription::builder()
            .table_status(TableStatus::Creating)
            .build();
        assert!(!table_is_active(&pending));
    }
}
