//! News update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

pub struct NewsUpdateBuilder(NewsUpdate);

impl NewsUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(NewsUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, val: impl Into<String>) -> Self {
        self.0.title = Some(val.into());
        self
    }

    #[must_use]
    pub fn content(mut self, val: impl Into<String>) -> Self {
        self.0.content = Some(val.into());
        self
    }

    #[must_use]
    pub fn build(self) -> NewsUpdate {
        self.0
    }
}

impl Default for NewsUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
