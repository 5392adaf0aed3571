//! Reference fields between collections.
//!
//! A stored reference is an opaque identifier until the caller explicitly
//! populates it, at which point it becomes the full referenced record. The
//! two states are an explicit sum type rather than a duck-typed field:
//! population transitions `Unresolved` to `Resolved`, never the other way.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A reference to a record in another (or the same) collection.
///
/// Serializes as the raw identifier string while unresolved and as the full
/// record once resolved, matching the stored wire contract. Deserialization
/// accepts both forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Ref<T> {
    /// Raw identifier, as stored.
    Unresolved(String),
    /// Full referenced record, after population.
    Resolved(Box<T>),
}

impl<T> Ref<T> {
    /// Build an unresolved reference from an identifier.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self::Unresolved(id.into())
    }

    /// Build a resolved reference from a full record.
    pub fn resolved(record: T) -> Self {
        Self::Resolved(Box::new(record))
    }

    /// The raw identifier, if this reference is still unresolved.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Unresolved(id) => Some(id),
            Self::Resolved(_) => None,
        }
    }

    /// The referenced record, if this reference has been populated.
    #[must_use]
    pub const fn record(&self) -> Option<&T> {
        match self {
            Self::Unresolved(_) => None,
            Self::Resolved(record) => Some(record),
        }
    }

    /// Whether this reference has been populated.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}
