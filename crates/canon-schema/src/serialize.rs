//! Outbound JSON normalization.
//!
//! The store's raw document envelope carries internal fields prefixed with an
//! underscore (`_id`, `_rev`). Normalization strips them and exposes the
//! identifier as the virtual `id` field, recursing into embedded documents.
//! It is idempotent and never touches stored data.

use serde_json::Value;

/// Normalize a raw document for presentation.
///
/// - every key starting with `_` is removed,
/// - `_id` is re-exposed as the virtual `id` field,
/// - arrays and embedded objects are normalized recursively,
/// - non-object values pass through unchanged.
#[must_use]
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            if let Some(id) = map.get("_id") {
                out.insert("id".to_string(), id.clone());
            }
            for (key, val) in map {
                if key.starts_with('_') {
                    continue;
                }
                out.insert(key.clone(), normalize(val));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        other => other.clone(),
    }
}
