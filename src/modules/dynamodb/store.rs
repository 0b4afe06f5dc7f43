use async_trait::async_trait;

use super::attribute_value::{AttributeValue, Item};
use super::model::{IndexCountQuery, TableDefinition};
use crate::core::error::Result;

/// Operations the seeder needs from a key-value table service.
///
/// Every call is an independent request; nothing here is transactional.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Create a table (with its secondary indexes). Fails with
    /// `ResourceInUseException` if it already exists.
    async fn create_table(&self, definition: &TableDefinition) -> Result<()>;

    /// Block until the table and its indexes are active
    async fn wait_until_exists(&self, table_name: &str) -> Result<()>;

    /// Insert or replace an item
    async fn put_item(&self, table_name: &str, item: Item) -> Result<()>;

    /// Point lookup by full primary key
    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>>;

    /// `SET <attribute> = <value>` on the item with the given key
    async fn update_attribute(
        &self,
        table_name: &str,
        key: Item,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<()>;

    /// Full table scan, following pagination to the end. When `projection`
    /// is given only those attributes are returned.
    async fn scan(&self, table_name: &str, projection: Option<&[&str]>) -> Result<Vec<Item>>;

    /// Count the items matching an index query
    async fn query_count(&self, query: &IndexCountQuery) -> Result<usize>;
}
