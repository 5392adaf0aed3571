//! Comment update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// `Some(None)` detaches the comment from its parent (`parent` becomes
    /// null); `Some(Some(id))` re-parents it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Option<String>>,
}

pub struct CommentUpdateBuilder(CommentUpdate);

impl CommentUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CommentUpdate::default())
    }

    #[must_use]
    pub fn content(mut self, val: impl Into<String>) -> Self {
        self.0.content = Some(val.into());
        self
    }

    #[must_use]
    pub fn parent(mut self, val: Option<String>) -> Self {
        self.0.parent = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> CommentUpdate {
        self.0
    }
}

impl Default for CommentUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
