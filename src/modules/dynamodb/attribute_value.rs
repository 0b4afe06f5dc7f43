//! Helpers around the SDK's `AttributeValue`

use std::collections::HashMap;

pub use aws_sdk_dynamodb::types::AttributeValue;

use crate::core::error::{AppError, Result};

/// A single item (or key)
pub type Item = HashMap<String, AttributeValue>;

pub fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

/// Numbers go over the wire in string form
pub fn n(value: f64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

pub fn null() -> AttributeValue {
    AttributeValue::Null(true)
}

/// `S` for `Some`, `NULL` for `None`
pub fn s_or_null(value: Option<impl Into<String>>) -> AttributeValue {
    value.map(s).unwrap_or_else(null)
}

/// Read a required string attribute
pub fn require_s<'a>(item: &'a Item, name: &str) -> Result<&'a str> {
    optional_s(item, name)
        .ok_or_else(|| AppError::InvalidItem(format!("missing string attribute '{}'", name)))
}

/// Read an optional string attribute; `NULL` and absence both map to `None`
pub fn optional_s<'a>(item: &'a Item, name: &str) -> Option<&'a str> {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .map(String::as_str)
}

/// Read a required number attribute
pub fn require_n(item: &Item, name: &str) -> Result<f64> {
    item.get(name)
        .and_then(|value| value.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| AppError::InvalidItem(format!("missing number attribute '{}'", name)))
}

/// Build a single-attribute key
pub fn key(name: &str, value: impl Into<String>) -> Item {
    HashMap::from([(name.to_string(), s(value))])
}
