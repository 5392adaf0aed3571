//! Theory repository — CRUD, comment refs, population.

use serde_json::{Value, json};

use canon_core::entities::Theory;
use canon_core::refs::Ref;

use crate::error::DatabaseError;
use crate::helpers::parse_entity;
use crate::service::CanonService;
use crate::updates::theory::TheoryUpdate;

impl CanonService {
    pub async fn create_theory(&self, title: &str, content: &str) -> Result<Theory, DatabaseError> {
        let raw = self
            .insert_document(
                "theory",
                json!({
                    "title": title,
                    "content": content,
                    "comments": []
                }),
            )
            .await?;
        parse_entity(&raw)
    }

    pub async fn get_theory(&self, id: &str) -> Result<Theory, DatabaseError> {
        parse_entity(&self.raw_document("theory", id).await?)
    }

    pub async fn update_theory(
        &self,
        id: &str,
        update: TheoryUpdate,
    ) -> Result<Theory, DatabaseError> {
        let patch = serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?;
        parse_entity(&self.update_document("theory", id, patch).await?)
    }

    pub async fn delete_theory(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_document("theory", id).await
    }

    pub async fn list_theories(&self, limit: u32) -> Result<Vec<Theory>, DatabaseError> {
        self.list_documents("theory", limit)
            .await?
            .iter()
            .map(parse_entity)
            .collect()
    }

    /// Attach a comment reference to a theory. Unlike news, theory comments
    /// live in the `comments` collection and are stored here by id. Idempotent.
    pub async fn add_theory_comment(
        &self,
        theory_id: &str,
        comment_id: &str,
    ) -> Result<Theory, DatabaseError> {
        let raw = self.raw_document("theory", theory_id).await?;
        let mut comments = raw["comments"].as_array().cloned().unwrap_or_default();
        if !comments.iter().any(|c| c.as_str() == Some(comment_id)) {
            comments.push(Value::String(comment_id.to_string()));
        }
        let updated = self
            .update_document("theory", theory_id, json!({ "comments": comments }))
            .await?;
        parse_entity(&updated)
    }

    /// Fetch a theory with comment references populated.
    pub async fn get_theory_populated(&self, id: &str) -> Result<Theory, DatabaseError> {
        let mut theory = self.get_theory(id).await?;
        for comment_ref in &mut theory.comments {
            if let Some(comment_id) = comment_ref.id().map(ToOwned::to_owned) {
                *comment_ref = Ref::resolved(self.get_comment(&comment_id).await?);
            }
        }
        Ok(theory)
    }
}
