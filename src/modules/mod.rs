//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services like the table store.

pub mod dynamodb;
