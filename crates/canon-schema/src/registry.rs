//! Central schema registry for all Canon record types.
//!
//! The `SchemaRegistry` builds JSON Schemas from canon-core types at
//! construction time using [`schemars::schema_for!`] and provides validation
//! via `jsonschema`. Every binding is independent at definition time; they
//! compose only through named references resolved by the store at query time.

use std::collections::HashMap;

use canon_core::entities::{Character, Comment, Episode, News, Theory};
use canon_core::enums::EntityType;
use canon_core::ids::{
    PREFIX_CHARACTER, PREFIX_COMMENT, PREFIX_EPISODE, PREFIX_NEWS, PREFIX_THEORY,
};

use crate::binding::SchemaBinding;
use crate::error::SchemaError;
use crate::plugin::to_json;

/// Central store of all record schemas in the Canon system.
///
/// Built from canon-core types. Provides lookup by name, validation of
/// arbitrary JSON values against registered schemas, and fail-fast duplicate
/// detection: a name or collection can be bound at most once.
pub struct SchemaRegistry {
    bindings: HashMap<&'static str, SchemaBinding>,
}

impl SchemaRegistry {
    /// Build a registry containing the five canonical entity bindings, each
    /// with the `to_json` plugin applied. None of them expire; expiration is
    /// opt-in per binding via [`crate::expire`].
    ///
    /// # Panics
    ///
    /// Panics if schema generation fails for a canon-core type. This is not
    /// expected in practice because `schemars` always produces valid
    /// JSON-serialisable output, and the canonical names are unique.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        let canonical = [
            SchemaBinding::of::<Character>(
                EntityType::Character.as_str(),
                "characters",
                PREFIX_CHARACTER,
            ),
            SchemaBinding::of::<Episode>(EntityType::Episode.as_str(), "Episodes", PREFIX_EPISODE),
            SchemaBinding::of::<Comment>(EntityType::Comment.as_str(), "comments", PREFIX_COMMENT),
            SchemaBinding::of::<News>(EntityType::News.as_str(), "News", PREFIX_NEWS),
            SchemaBinding::of::<Theory>(EntityType::Theory.as_str(), "theories", PREFIX_THEORY),
        ];
        for binding in canonical {
            let binding = binding.expect("schema generation for canonical type");
            registry
                .register(binding.apply(to_json))
                .expect("canonical binding names are unique");
        }
        registry
    }

    /// Build an empty registry (for callers composing their own bindings).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Register a binding.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Duplicate` if the binding's name or collection
    /// is already registered. Conflicting definitions of the same entity can
    /// therefore never coexist.
    pub fn register(&mut self, binding: SchemaBinding) -> Result<(), SchemaError> {
        if self.bindings.contains_key(binding.name()) {
            return Err(SchemaError::Duplicate(binding.name().to_string()));
        }
        if self
            .bindings
            .values()
            .any(|b| b.collection() == binding.collection())
        {
            return Err(SchemaError::Duplicate(binding.collection().to_string()));
        }
        self.bindings.insert(binding.name(), binding);
        Ok(())
    }

    /// Get a binding by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaBinding> {
        self.bindings.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors. A
    /// missing required field produces an error message naming that field.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let binding = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(binding.schema())
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// List all registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.bindings.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all registered bindings.
    pub fn bindings(&self) -> impl Iterator<Item = &SchemaBinding> {
        self.bindings.values()
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.bindings.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{ExpireOptions, expire};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    #[test]
    fn registry_has_canonical_bindings() {
        let reg = registry();
        assert_eq!(reg.schema_count(), 5);
        assert_eq!(
            reg.list(),
            vec!["character", "comment", "episode", "news", "theory"]
        );
    }

    #[test]
    fn collection_names_preserve_legacy_casing() {
        let reg = registry();
        assert_eq!(reg.get("character").unwrap().collection(), "characters");
        assert_eq!(reg.get("episode").unwrap().collection(), "Episodes");
        assert_eq!(reg.get("comment").unwrap().collection(), "comments");
        assert_eq!(reg.get("news").unwrap().collection(), "News");
        assert_eq!(reg.get("theory").unwrap().collection(), "theories");
    }

    #[test]
    fn canonical_bindings_normalize_output_and_never_expire() {
        let reg = registry();
        for binding in reg.bindings() {
            assert!(binding.normalize_output(), "{}", binding.name());
            assert!(binding.expire_after_secs().is_none(), "{}", binding.name());
        }
    }

    #[test]
    fn duplicate_name_fails_fast() {
        let mut reg = registry();
        let dup = SchemaBinding::of::<canon_core::entities::Theory>(
            "theory",
            "theories_v2",
            "thr",
        )
        .unwrap();
        let result = reg.register(dup);
        assert!(matches!(result, Err(SchemaError::Duplicate(name)) if name == "theory"));
        assert_eq!(reg.schema_count(), 5);
    }

    #[test]
    fn duplicate_collection_fails_fast() {
        let mut reg = registry();
        let dup = SchemaBinding::of::<canon_core::entities::Theory>(
            "theory_v2",
            "theories",
            "thr",
        )
        .unwrap();
        let result = reg.register(dup);
        assert!(matches!(result, Err(SchemaError::Duplicate(name)) if name == "theories"));
    }

    #[test]
    fn register_expiring_binding() {
        let mut reg = registry();
        let binding = SchemaBinding::of::<canon_core::entities::Comment>(
            "flash_comment",
            "flash_comments",
            "cmt",
        )
        .unwrap()
        .apply(expire(ExpireOptions { expires: 60 }));
        reg.register(binding).unwrap();
        assert_eq!(reg.get("flash_comment").unwrap().expire_after_secs(), Some(60));
    }

    #[test]
    fn validate_valid_comment_payload() {
        let reg = registry();
        let payload = json!({
            "content": "first!",
            "author": "usr-1",
            "parent": null
        });
        assert!(reg.validate("comment", &payload).is_ok());
    }

    #[test]
    fn validate_rejects_missing_required_field_naming_it() {
        let reg = registry();
        let payload = json!({ "author": "usr-1", "parent": null });
        let result = reg.validate("comment", &payload);
        let Err(SchemaError::ValidationFailed { errors }) = result else {
            panic!("Expected ValidationFailed");
        };
        assert!(
            errors.iter().any(|e| e.contains("content")),
            "errors should name the missing field: {errors:?}"
        );
    }

    #[test]
    fn validate_rejects_wrong_type() {
        let reg = registry();
        let payload = json!({ "externalId": "not-a-number" });
        assert!(reg.validate("character", &payload).is_err());
    }

    #[test]
    fn validate_accepts_timestamps_when_present() {
        let reg = registry();
        let payload = json!({
            "externalId": 7,
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        });
        assert!(reg.validate("character", &payload).is_ok());
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let reg = registry();
        let result = reg.validate("bogus", &json!({}));
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }
}
