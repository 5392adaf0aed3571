//! Episode repository — CRUD, comment refs, population.

use serde_json::{Value, json};

use canon_core::entities::Episode;
use canon_core::refs::Ref;

use crate::error::DatabaseError;
use crate::helpers::parse_entity;
use crate::service::CanonService;
use crate::updates::episode::EpisodeUpdate;

impl CanonService {
    pub async fn create_episode(&self, external_id: i64) -> Result<Episode, DatabaseError> {
        let raw = self
            .insert_document(
                "episode",
                json!({
                    "externalId": external_id,
                    "characters": [],
                    "comments": []
                }),
            )
            .await?;
        parse_entity(&raw)
    }

    pub async fn get_episode(&self, id: &str) -> Result<Episode, DatabaseError> {
        parse_entity(&self.raw_document("episode", id).await?)
    }

    pub async fn update_episode(
        &self,
        id: &str,
        update: EpisodeUpdate,
    ) -> Result<Episode, DatabaseError> {
        let patch = serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?;
        parse_entity(&self.update_document("episode", id, patch).await?)
    }

    pub async fn delete_episode(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_document("episode", id).await
    }

    pub async fn list_episodes(&self, limit: u32) -> Result<Vec<Episode>, DatabaseError> {
        self.list_documents("episode", limit)
            .await?
            .iter()
            .map(parse_entity)
            .collect()
    }

    /// Attach a comment reference to an episode. Idempotent.
    pub async fn add_episode_comment(
        &self,
        episode_id: &str,
        comment_id: &str,
    ) -> Result<Episode, DatabaseError> {
        let raw = self.raw_document("episode", episode_id).await?;
        let mut comments = raw["comments"].as_array().cloned().unwrap_or_default();
        if !comments.iter().any(|c| c.as_str() == Some(comment_id)) {
            comments.push(Value::String(comment_id.to_string()));
        }
        let updated = self
            .update_document("episode", episode_id, json!({ "comments": comments }))
            .await?;
        parse_entity(&updated)
    }

    /// Fetch an episode with character and comment references populated.
    pub async fn get_episode_populated(&self, id: &str) -> Result<Episode, DatabaseError> {
        let mut episode = self.get_episode(id).await?;
        for character_ref in &mut episode.characters {
            if let Some(character_id) = character_ref.id().map(ToOwned::to_owned) {
                *character_ref = Ref::resolved(self.get_character(&character_id).await?);
            }
        }
        for comment_ref in &mut episode.comments {
            if let Some(comment_id) = comment_ref.id().map(ToOwned::to_owned) {
                *comment_ref = Ref::resolved(self.get_comment(&comment_id).await?);
            }
        }
        Ok(episode)
    }
}
