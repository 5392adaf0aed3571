use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Comment, Episode};
use crate::refs::Ref;

/// A show character, keyed by its external catalogue ID.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub external_id: i64,
    /// Episodes this character appears in (many-to-many).
    #[serde(default)]
    pub episodes: Vec<Ref<Episode>>,
    /// Line-reading records, embedded in the character document.
    #[serde(default)]
    pub replicas: Vec<Replica>,
    #[serde(default)]
    pub comments: Vec<Ref<Comment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An embedded line-reading record tying a character to an episode.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Replica {
    pub content: String,
    #[serde(default)]
    pub character: Option<Ref<Character>>,
    #[serde(default)]
    pub episode: Option<Ref<Episode>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
