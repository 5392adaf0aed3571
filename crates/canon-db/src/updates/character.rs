//! Character update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<i64>,
}

pub struct CharacterUpdateBuilder(CharacterUpdate);

impl CharacterUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CharacterUpdate::default())
    }

    #[must_use]
    pub const fn external_id(mut self, val: i64) -> Self {
        self.0.external_id = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> CharacterUpdate {
        self.0
    }
}

impl Default for CharacterUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
