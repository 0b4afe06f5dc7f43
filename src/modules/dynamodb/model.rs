//! Table layouts as the seeder describes them. The client turns these into
//! SDK `CreateTable` input.

use super::attribute_value::AttributeValue;

/// Read/write capacity units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub read: i64,
    pub write: i64,
}

impl Capacity {
    pub fn new(read: i64, write: i64) -> Self {
        Self { read, write }
    }
}

/// Attributes copied into a secondary index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexProjection {
    All,
    Include(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub index_name: String,
    pub hash_key: String,
    pub range_key: Option<String>,
    pub projection: IndexProjection,
    pub capacity: Capacity,
}

/// Everything needed to create a table. Every key attribute is a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub table_name: String,
    pub hash_key: String,
    pub range_key: Option<String>,
    pub capacity: Capacity,
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    /// Attribute names that make up the primary key, hash first
    pub fn key_attributes(&self) -> Vec<&str> {
        std::iter::once(self.hash_key.as_str())
            .chain(self.range_key.as_deref())
            .collect()
    }

    /// Every attribute used as a table or index key, each named once
    pub fn key_attribute_names(&self) -> Vec<&str> {
        let index_keys = self.indexes.iter().flat_map(|index| {
            std::iter::once(index.hash_key.as_str()).chain(index.range_key.as_deref())
        });

        let mut names: Vec<&str> = Vec::new();
        for name in self.key_attributes().into_iter().chain(index_keys) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Equality query against a secondary index, optionally filtered on one
/// more attribute. Only the match count is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexCountQuery {
    pub table_name: String,
    pub index_name: String,
    pub key_attribute: String,
    pub key_value: AttributeValue,
    pub filter: Option<(String, AttributeValue)>,
}
