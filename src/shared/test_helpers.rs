use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::core::error::{AppError, Result, StoreError};
use crate::features::reports::models::{
    Department, Location, Report, ReportStatus, Stage, StageRecord,
};
use crate::modules::dynamodb::attribute_value::optional_s;
use crate::modules::dynamodb::{AttributeValue, IndexCountQuery, Item, TableDefinition, TableStore};
use crate::shared::constants::{ATTR_REPORT_ID, ATTR_STATUS, REPORT_TABLE};

struct MemoryTable {
    definition: TableDefinition,
    /// Items ordered by their key values, hash first
    items: BTreeMap<Vec<String>, Item>,
}

impl MemoryTable {
    fn key_of(&self, item: &Item) -> Result<Vec<String>> {
        self.definition
            .key_attributes()
            .into_iter()
            .map(|name| match item.get(name) {
                Some(AttributeValue::S(s)) | Some(AttributeValue::N(s)) => Ok(s.clone()),
                _ => Err(validation(format!("missing key attribute '{}'", name))),
            })
            .collect()
    }
}

struct FailureRule {
    operation: String,
    table_name: String,
    /// Number of successful calls allowed before the failing one
    after: usize,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, MemoryTable>,
    calls: HashMap<(String, String), usize>,
    failures: Vec<FailureRule>,
}

/// In-memory `TableStore` with call counting and one-shot failure injection
#[derive(Default)]
pub struct MemoryTableStore {
    state: Mutex<MemoryState>,
}

fn not_found(table_name: &str) -> AppError {
    StoreError::new(
        "ResourceNotFoundException",
        format!("Requested resource not found: Table: {} not found", table_name),
    )
    .into()
}

fn validation(message: String) -> AppError {
    StoreError::new("ValidationException", message).into()
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `(after + 1)`-th call of `operation` on `table_name` fail once
    pub fn fail_on(&self, operation: &str, table_name: &str, after: usize) {
        self.lock().failures.push(FailureRule {
            operation: operation.to_string(),
            table_name: table_name.to_string(),
            after,
        });
    }

    /// Calls made so far, failed ones included
    pub fn call_count(&self, operation: &str, table_name: &str) -> usize {
        self.lock()
            .calls
            .get(&(operation.to_string(), table_name.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn items(&self, table_name: &str) -> Vec<Item> {
        self.lock()
            .tables
            .get(table_name)
            .map(|table| table.items.values().cloned().collect())
            .unwrap_or_default()
    }

    /// First item whose hash key is `id`
    pub fn item(&self, table_name: &str, id: &str) -> Option<Item> {
        let state = self.lock();
        let table = state.tables.get(table_name)?;
        table
            .items
            .iter()
            .find(|(key, _)| key.first().map(String::as_str) == Some(id))
            .map(|(_, item)| item.clone())
    }

    pub fn remove_item(&self, table_name: &str, id: &str) {
        if let Some(table) = self.lock().tables.get_mut(table_name) {
            table
                .items
                .retain(|key, _| key.first().map(String::as_str) != Some(id));
        }
    }

    pub fn set_attribute(&self, table_name: &str, id: &str, attribute: &str, value: AttributeValue) {
        if let Some(table) = self.lock().tables.get_mut(table_name) {
            for (key, item) in table.items.iter_mut() {
                if key.first().map(String::as_str) == Some(id) {
                    item.insert(attribute.to_string(), value.clone());
                }
            }
        }
    }

    /// Register a table without going through `create_table`
    pub fn create_table_now(&self, definition: TableDefinition) {
        self.lock().tables.insert(
            definition.table_name.clone(),
            MemoryTable {
                definition,
                items: BTreeMap::new(),
            },
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the call and apply any matching failure rule
    fn record_call(state: &mut MemoryState, operation: &str, table_name: &str) -> Result<()> {
        let count = state
            .calls
            .entry((operation.to_string(), table_name.to_string()))
            .or_default();
        let index = *count;
        *count += 1;

        let position = state.failures.iter().position(|rule| {
            rule.operation == operation && rule.table_name == table_name && rule.after == index
        });
        if let Some(position) = position {
            state.failures.remove(position);
            return Err(StoreError::new(
                "InternalServerError",
                format!("injected failure for {} on {}", operation, table_name),
            )
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn create_table(&self, definition: &TableDefinition) -> Result<()> {
        let mut state = self.lock();
        Self::record_call(&mut state, "CreateTable", &definition.table_name)?;

        if state.tables.contains_key(&definition.table_name) {
            return Err(StoreError::new(
                "ResourceInUseException",
                format!("Table already exists: {}", definition.table_name),
            )
            .into());
        }
        state.tables.insert(
            definition.table_name.clone(),
            MemoryTable {
                definition: definition.clone(),
                items: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn wait_until_exists(&self, table_name: &str) -> Result<()> {
        if self.lock().tables.contains_key(table_name) {
            Ok(())
        } else {
            Err(not_found(table_name))
        }
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        let mut state = self.lock();
        Self::record_call(&mut state, "PutItem", table_name)?;

        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| not_found(table_name))?;
        let key = table.key_of(&item)?;
        table.items.insert(key, item);
        Ok(())
    }

    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>> {
        let mut state = self.lock();
        Self::record_call(&mut state, "GetItem", table_name)?;

        let table = state
            .tables
            .get(table_name)
            .ok_or_else(|| not_found(table_name))?;
        let key = table.key_of(&key)?;
        Ok(table.items.get(&key).cloned())
    }

    async fn update_attribute(
        &self,
        table_name: &str,
        key: Item,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<()> {
        let mut state = self.lock();
        Self::record_call(&mut state, "UpdateItem", table_name)?;

        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| not_found(table_name))?;
        let key_values = table.key_of(&key)?;
        table
            .items
            .entry(key_values)
            .or_insert(key)
            .insert(attribute.to_string(), value);
        Ok(())
    }

    async fn scan(&self, table_name: &str, projection: Option<&[&str]>) -> Result<Vec<Item>> {
        let mut state = self.lock();
        Self::record_call(&mut state, "Scan", table_name)?;

        let table = state
            .tables
            .get(table_name)
            .ok_or_else(|| not_found(table_name))?;
        let items = table
            .items
            .values()
            .map(|item| match projection {
                Some(names) => item
                    .iter()
                    .filter(|(name, _)| names.contains(&name.as_str()))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
                None => item.clone(),
            })
            .collect();
        Ok(items)
    }

    async fn query_count(&self, query: &IndexCountQuery) -> Result<usize> {
        let mut state = self.lock();
        Self::record_call(&mut state, "Query", &query.table_name)?;

        let table = state
            .tables
            .get(&query.table_name)
            .ok_or_else(|| not_found(&query.table_name))?;
        let has_index = table
            .definition
            .indexes
            .iter()
            .any(|index| index.index_name == query.index_name);
        if !has_index {
            return Err(validation(format!(
                "The table does not have the specified index: {}",
                query.index_name
            )));
        }

        let count = table
            .items
            .values()
            .filter(|item| item.get(&query.key_attribute) == Some(&query.key_value))
            .filter(|item| match &query.filter {
                Some((name, value)) => item.get(name) == Some(value),
                None => true,
            })
            .count();
        Ok(count)
    }
}

/// Insert a staged-layout report directly, bypassing call counting
pub fn put_report(store: &MemoryTableStore, id: &str, department: Department, status: ReportStatus) {
    let report = Report {
        report_id: id.to_string(),
        department,
        details: "Conveyor belt jammed near loading dock".to_string(),
        location: Location {
            latitude: 13.736717,
            longitude: 100.523186,
        },
        topic: "Conveyor jam".to_string(),
        username: "worker@example.com".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        status,
        image_url: None,
    };
    insert_raw(store, REPORT_TABLE, report.to_item());
}

/// Insert a stage record for `id` directly, bypassing call counting
pub fn put_stage(store: &MemoryTableStore, stage: Stage, id: &str) {
    let record = StageRecord {
        report_id: id.to_string(),
        comment: stage.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap(),
        image_url: None,
        updater: "worker@example.com".to_string(),
        updater_role: Department::Hr.worker_role(),
        department: Department::Hr,
    };
    insert_raw(store, stage.table_name(), record.to_item());
}

/// Current `status` of a staged-layout report
pub fn stored_status(store: &MemoryTableStore, id: &str) -> Option<String> {
    let item = store.item(REPORT_TABLE, id)?;
    optional_s(&item, ATTR_STATUS).map(str::to_string)
}

fn insert_raw(store: &MemoryTableStore, table_name: &str, item: Item) {
    let mut state = store.lock();
    let table = state
        .tables
        .get_mut(table_name)
        .unwrap_or_else(|| panic!("table {} not created", table_name));
    let key = table.key_of(&item).unwrap();
    assert!(item.contains_key(ATTR_REPORT_ID));
    table.items.insert(key, item);
}
