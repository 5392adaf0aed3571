//! News repository — CRUD with embedded comment documents.

use chrono::Utc;
use serde_json::json;

use canon_core::entities::News;
use canon_core::ids::PREFIX_COMMENT;

use crate::error::DatabaseError;
use crate::helpers::parse_entity;
use crate::service::CanonService;
use crate::updates::news::NewsUpdate;

impl CanonService {
    pub async fn create_news(&self, title: &str, content: &str) -> Result<News, DatabaseError> {
        let raw = self
            .insert_document(
                "news",
                json!({
                    "title": title,
                    "content": content,
                    "comments": []
                }),
            )
            .await?;
        parse_entity(&raw)
    }

    pub async fn get_news(&self, id: &str) -> Result<News, DatabaseError> {
        parse_entity(&self.raw_document("news", id).await?)
    }

    pub async fn update_news(&self, id: &str, update: NewsUpdate) -> Result<News, DatabaseError> {
        let patch = serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?;
        parse_entity(&self.update_document("news", id, patch).await?)
    }

    pub async fn delete_news(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_document("news", id).await
    }

    pub async fn list_news(&self, limit: u32) -> Result<Vec<News>, DatabaseError> {
        self.list_documents("news", limit)
            .await?
            .iter()
            .map(parse_entity)
            .collect()
    }

    /// Append an embedded comment document to a news item. The comment lives
    /// inside the news document, not in the `comments` collection, and still
    /// gets its own identifier and timestamps.
    pub async fn add_news_comment(
        &self,
        news_id: &str,
        content: &str,
        author: &str,
    ) -> Result<News, DatabaseError> {
        let raw = self.raw_document("news", news_id).await?;
        let mut comments = raw["comments"].as_array().cloned().unwrap_or_default();

        let id = self.db().generate_id(PREFIX_COMMENT).await?;
        let now = Utc::now().to_rfc3339();
        comments.push(json!({
            "id": id,
            "content": content,
            "author": author,
            "parent": null,
            "createdAt": now,
            "updatedAt": now
        }));

        let updated = self
            .update_document("news", news_id, json!({ "comments": comments }))
            .await?;
        parse_entity(&updated)
    }
}
