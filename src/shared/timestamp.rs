use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::core::error::{AppError, Result};

/// Wire form of every timestamp we write: `2024-09-25T10:00:00Z`
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and offset-less ISO 8601 (`2024-09-25T10:00:00.123456`),
/// the latter taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::InvalidItem(format!("invalid timestamp '{}': {}", value, e)))
}
