use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::refs::Ref;

/// A user comment. Comments form a reply tree through the optional `parent`
/// self-reference; nesting depth is unbounded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    /// Opaque identifier of the authoring user. The users collection is
    /// owned by the auth layer and is never populated here.
    pub author: String,
    /// Parent comment when this is a reply, `None` for top-level comments.
    #[serde(default)]
    pub parent: Option<Ref<Comment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
