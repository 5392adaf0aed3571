//! Entity-type enum.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Every registrable entity type in the Canon data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Character,
    Episode,
    Comment,
    News,
    Theory,
}

impl EntityType {
    /// Stable string form, matching the registry name of the entity's schema.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Episode => "episode",
            Self::Comment => "comment",
            Self::News => "news",
            Self::Theory => "theory",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
