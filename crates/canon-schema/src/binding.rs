//! Immutable shape descriptors binding a record type to a collection.

use schemars::JsonSchema;
use serde_json::Value;

use crate::error::SchemaError;

/// Fields populated by the store itself. They appear in the generated schema
/// but are not required of insert payloads.
const AUTO_MANAGED: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// A registered record shape: registry name, storage collection, ID prefix,
/// generated JSON Schema, and plugin state.
///
/// Bindings are immutable once registered. Plugins transform a binding into a
/// new one via [`SchemaBinding::apply`]; nothing mutates a binding after the
/// fact.
#[derive(Debug, Clone)]
pub struct SchemaBinding {
    name: &'static str,
    collection: &'static str,
    id_prefix: &'static str,
    schema: Value,
    normalize_output: bool,
    expire_after_secs: Option<u64>,
}

impl SchemaBinding {
    /// Build a binding for record type `T`, generating its JSON Schema via
    /// [`schemars::schema_for!`].
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Generation` if the generated schema cannot be
    /// converted to a JSON value (not expected in practice).
    pub fn of<T: JsonSchema>(
        name: &'static str,
        collection: &'static str,
        id_prefix: &'static str,
    ) -> Result<Self, SchemaError> {
        let mut schema = serde_json::to_value(schemars::schema_for!(T))
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;
        relax_auto_managed(&mut schema);
        Ok(Self {
            name,
            collection,
            id_prefix,
            schema,
            normalize_output: false,
            expire_after_secs: None,
        })
    }

    /// Apply a plugin transform, yielding the transformed binding.
    #[must_use]
    pub fn apply(self, plugin: impl FnOnce(Self) -> Self) -> Self {
        plugin(self)
    }

    /// Registry-wide unique name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Storage collection name. Part of the stored contract; casing is
    /// preserved bit-exact (`characters`, `Episodes`, `comments`, `News`,
    /// `theories`).
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        self.collection
    }

    /// Prefix for generated document identifiers.
    #[must_use]
    pub const fn id_prefix(&self) -> &'static str {
        self.id_prefix
    }

    /// The generated JSON Schema, with store-managed fields relaxed.
    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    /// Whether outbound representations of this binding are normalized.
    #[must_use]
    pub const fn normalize_output(&self) -> bool {
        self.normalize_output
    }

    /// Seconds after a document's `expiration` timestamp at which it becomes
    /// eligible for removal, when the expire plugin is attached.
    #[must_use]
    pub const fn expire_after_secs(&self) -> Option<u64> {
        self.expire_after_secs
    }

    pub(crate) const fn with_normalized_output(mut self) -> Self {
        self.normalize_output = true;
        self
    }

    pub(crate) fn with_expiration(mut self, expires: u64) -> Self {
        if let Some(props) = self.schema.get_mut("properties").and_then(Value::as_object_mut) {
            props.insert(
                "expiration".to_string(),
                serde_json::json!({ "type": "string", "format": "date-time" }),
            );
        }
        self.expire_after_secs = Some(expires);
        self
    }
}

fn relax_auto_managed(schema: &mut Value) {
    relax_required(schema);
    // Embedded document definitions get the same treatment: the store (or
    // the embedding repo method) assigns their ids and timestamps too.
    if let Some(defs) = schema.get_mut("$defs").and_then(Value::as_object_mut) {
        for def in defs.values_mut() {
            relax_required(def);
        }
    }
}

fn relax_required(schema: &mut Value) {
    if let Some(required) = schema.get_mut("required").and_then(Value::as_array_mut) {
        required.retain(|f| f.as_str().is_none_or(|s| !AUTO_MANAGED.contains(&s)));
    }
}
