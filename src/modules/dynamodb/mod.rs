//! Table store module
//!
//! Provides a DynamoDB client (AWS SDK) behind the `TableStore` trait.

pub mod attribute_value;
mod client;
pub mod model;
mod store;

pub use attribute_value::{AttributeValue, Item};
pub use client::DynamoDbClient;
pub use model::{IndexCountQuery, TableDefinition};
pub use store::TableStore;
