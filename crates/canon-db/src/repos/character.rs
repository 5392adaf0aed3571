//! Character repository — CRUD, embedded replicas, episode links, population.

use chrono::Utc;
use serde_json::{Value, json};

use canon_core::entities::Character;
use canon_core::refs::Ref;

use crate::error::DatabaseError;
use crate::helpers::parse_entity;
use crate::service::CanonService;
use crate::updates::character::CharacterUpdate;

impl CanonService {
    pub async fn create_character(&self, external_id: i64) -> Result<Character, DatabaseError> {
        let raw = self
            .insert_document(
                "character",
                json!({
                    "externalId": external_id,
                    "episodes": [],
                    "replicas": [],
                    "comments": []
                }),
            )
            .await?;
        parse_entity(&raw)
    }

    pub async fn get_character(&self, id: &str) -> Result<Character, DatabaseError> {
        parse_entity(&self.raw_document("character", id).await?)
    }

    pub async fn update_character(
        &self,
        id: &str,
        update: CharacterUpdate,
    ) -> Result<Character, DatabaseError> {
        let patch = serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?;
        parse_entity(&self.update_document("character", id, patch).await?)
    }

    pub async fn delete_character(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_document("character", id).await
    }

    pub async fn list_characters(&self, limit: u32) -> Result<Vec<Character>, DatabaseError> {
        self.list_documents("character", limit)
            .await?
            .iter()
            .map(parse_entity)
            .collect()
    }

    /// Append an embedded line-reading record to a character.
    pub async fn add_replica(
        &self,
        character_id: &str,
        content: &str,
        episode_id: Option<&str>,
    ) -> Result<Character, DatabaseError> {
        let raw = self.raw_document("character", character_id).await?;
        let mut replicas = raw["replicas"].as_array().cloned().unwrap_or_default();

        let now = Utc::now().to_rfc3339();
        let mut replica = json!({
            "content": content,
            "character": character_id,
            "createdAt": now,
            "updatedAt": now
        });
        if let Some(episode_id) = episode_id {
            replica["episode"] = json!(episode_id);
        }
        replicas.push(replica);

        let updated = self
            .update_document("character", character_id, json!({ "replicas": replicas }))
            .await?;
        parse_entity(&updated)
    }

    /// Attach a comment reference to a character. Idempotent.
    pub async fn add_character_comment(
        &self,
        character_id: &str,
        comment_id: &str,
    ) -> Result<Character, DatabaseError> {
        let raw = self.raw_document("character", character_id).await?;
        let mut comments = raw["comments"].as_array().cloned().unwrap_or_default();
        if !comments.iter().any(|c| c.as_str() == Some(comment_id)) {
            comments.push(Value::String(comment_id.to_string()));
        }
        let updated = self
            .update_document("character", character_id, json!({ "comments": comments }))
            .await?;
        parse_entity(&updated)
    }

    /// Link a character and an episode, maintaining the many-to-many arrays
    /// on both sides. Idempotent; both documents must exist.
    pub async fn link_character_episode(
        &self,
        character_id: &str,
        episode_id: &str,
    ) -> Result<(), DatabaseError> {
        let character = self.raw_document("character", character_id).await?;
        let episode = self.raw_document("episode", episode_id).await?;

        let mut episodes = character["episodes"].as_array().cloned().unwrap_or_default();
        if !episodes.iter().any(|e| e.as_str() == Some(episode_id)) {
            episodes.push(Value::String(episode_id.to_string()));
            self.update_document("character", character_id, json!({ "episodes": episodes }))
                .await?;
        }

        let mut characters = episode["characters"].as_array().cloned().unwrap_or_default();
        if !characters.iter().any(|c| c.as_str() == Some(character_id)) {
            characters.push(Value::String(character_id.to_string()));
            self.update_document("episode", episode_id, json!({ "characters": characters }))
                .await?;
        }

        Ok(())
    }

    /// Fetch a character with episode and comment references populated.
    pub async fn get_character_populated(&self, id: &str) -> Result<Character, DatabaseError> {
        let mut character = self.get_character(id).await?;
        for episode_ref in &mut character.episodes {
            if let Some(episode_id) = episode_ref.id().map(ToOwned::to_owned) {
                *episode_ref = Ref::resolved(self.get_episode(&episode_id).await?);
            }
        }
        for comment_ref in &mut character.comments {
            if let Some(comment_id) = comment_ref.id().map(ToOwned::to_owned) {
                *comment_ref = Ref::resolved(self.get_comment(&comment_id).await?);
            }
        }
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use crate::updates::character::CharacterUpdateBuilder;
    use canon_schema::SchemaError;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_character_roundtrip() {
        let svc = test_service().await;

        let character = svc.create_character(42).await.unwrap();
        assert!(character.id.starts_with("chr-"));
        assert_eq!(character.external_id, 42);
        assert!(character.episodes.is_empty());
        assert!(character.replicas.is_empty());
        assert!(character.comments.is_empty());

        let fetched = svc.get_character(&character.id).await.unwrap();
        assert_eq!(fetched, character);
    }

    #[tokio::test]
    async fn create_character_requires_external_id() {
        let svc = test_service().await;
        let result = svc
            .insert_document("character", serde_json::json!({ "episodes": [] }))
            .await;
        let Err(DatabaseError::Schema(SchemaError::ValidationFailed { errors })) = result else {
            panic!("Expected validation failure");
        };
        assert!(errors.iter().any(|e| e.contains("externalId")));
    }

    #[tokio::test]
    async fn update_character_external_id() {
        let svc = test_service().await;
        let character = svc.create_character(1).await.unwrap();

        let update = CharacterUpdateBuilder::new().external_id(2).build();
        let updated = svc.update_character(&character.id, update).await.unwrap();
        assert_eq!(updated.external_id, 2);
    }

    #[tokio::test]
    async fn add_replica_embeds_line_reading() {
        let svc = test_service().await;
        let character = svc.create_character(1).await.unwrap();
        let episode = svc.create_episode(10).await.unwrap();

        let updated = svc
            .add_replica(&character.id, "I am the one who knocks", Some(&episode.id))
            .await
            .unwrap();

        assert_eq!(updated.replicas.len(), 1);
        let replica = &updated.replicas[0];
        assert_eq!(replica.content, "I am the one who knocks");
        assert_eq!(
            replica.character.as_ref().and_then(|r| r.id()),
            Some(character.id.as_str())
        );
        assert_eq!(
            replica.episode.as_ref().and_then(|r| r.id()),
            Some(episode.id.as_str())
        );
    }

    #[tokio::test]
    async fn link_character_episode_maintains_both_sides() {
        let svc = test_service().await;
        let character = svc.create_character(1).await.unwrap();
        let episode = svc.create_episode(10).await.unwrap();

        svc.link_character_episode(&character.id, &episode.id)
            .await
            .unwrap();
        // Idempotent.
        svc.link_character_episode(&character.id, &episode.id)
            .await
            .unwrap();

        let character = svc.get_character(&character.id).await.unwrap();
        assert_eq!(character.episodes.len(), 1);
        assert_eq!(character.episodes[0].id(), Some(episode.id.as_str()));

        let episode = svc.get_episode(&episode.id).await.unwrap();
        assert_eq!(episode.characters.len(), 1);
        assert_eq!(episode.characters[0].id(), Some(character.id.as_str()));
    }

    #[tokio::test]
    async fn link_to_missing_episode_fails() {
        let svc = test_service().await;
        let character = svc.create_character(1).await.unwrap();
        let result = svc
            .link_character_episode(&character.id, "epi-missing")
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn populate_character_references() {
        let svc = test_service().await;
        let character = svc.create_character(1).await.unwrap();
        let episode = svc.create_episode(10).await.unwrap();
        let comment = svc.create_comment("nice", "usr-1", None).await.unwrap();

        svc.link_character_episode(&character.id, &episode.id)
            .await
            .unwrap();
        svc.add_character_comment(&character.id, &comment.id)
            .await
            .unwrap();

        let populated = svc.get_character_populated(&character.id).await.unwrap();
        assert!(populated.episodes[0].is_resolved());
        assert_eq!(populated.episodes[0].record().unwrap().external_id, 10);
        assert!(populated.comments[0].is_resolved());
        assert_eq!(populated.comments[0].record().unwrap().content, "nice");
    }

    #[tokio::test]
    async fn delete_character() {
        let svc = test_service().await;
        let character = svc.create_character(1).await.unwrap();
        svc.delete_character(&character.id).await.unwrap();
        assert!(matches!(
            svc.get_character(&character.id).await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn list_characters() {
        let svc = test_service().await;
        for i in 0..3 {
            svc.create_character(i).await.unwrap();
        }
        let characters = svc.list_characters(10).await.unwrap();
        assert_eq!(characters.len(), 3);
    }
}
