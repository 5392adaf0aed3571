use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Character, Comment};
use crate::refs::Ref;

/// A show episode, keyed by its external catalogue ID.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub external_id: i64,
    /// Characters appearing in this episode (many-to-many).
    #[serde(default)]
    pub characters: Vec<Ref<Character>>,
    #[serde(default)]
    pub comments: Vec<Ref<Comment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
