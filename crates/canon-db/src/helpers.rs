//! Row and document parsing helpers.
//!
//! Repos convert raw document envelopes into typed entity structs by
//! normalizing the envelope first (internal fields stripped, virtual `id`
//! exposed) and deserializing the result. Datetime parsing handles both
//! RFC 3339 and `SQLite`'s default format.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::DatabaseError;

/// Parse a TEXT timestamp as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s
/// default format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either
/// format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty
/// string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Normalize a raw document envelope and deserialize it into a typed entity.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the normalized document does not match
/// the entity shape.
pub fn parse_entity<T: serde::de::DeserializeOwned>(raw: &Value) -> Result<T, DatabaseError> {
    serde_json::from_value(canon_schema::serialize::normalize(raw))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse document: {e}")))
}
