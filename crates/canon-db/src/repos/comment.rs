//! Comment repository — CRUD + reply-tree population.

use serde_json::json;

use canon_core::entities::Comment;
use canon_core::refs::Ref;

use crate::error::DatabaseError;
use crate::helpers::parse_entity;
use crate::service::CanonService;
use crate::updates::comment::CommentUpdate;

impl CanonService {
    /// Create a comment. `parent` is the identifier of the comment being
    /// replied to, or `None` for a top-level comment. Parent existence is
    /// not enforced here (soft constraint, left to the caller).
    pub async fn create_comment(
        &self,
        content: &str,
        author: &str,
        parent: Option<&str>,
    ) -> Result<Comment, DatabaseError> {
        let raw = self
            .insert_document(
                "comment",
                json!({
                    "content": content,
                    "author": author,
                    "parent": parent
                }),
            )
            .await?;
        parse_entity(&raw)
    }

    pub async fn get_comment(&self, id: &str) -> Result<Comment, DatabaseError> {
        parse_entity(&self.raw_document("comment", id).await?)
    }

    pub async fn update_comment(
        &self,
        id: &str,
        update: CommentUpdate,
    ) -> Result<Comment, DatabaseError> {
        let patch = serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?;
        parse_entity(&self.update_document("comment", id, patch).await?)
    }

    pub async fn delete_comment(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_document("comment", id).await
    }

    pub async fn list_comments(&self, limit: u32) -> Result<Vec<Comment>, DatabaseError> {
        self.list_documents("comment", limit)
            .await?
            .iter()
            .map(parse_entity)
            .collect()
    }

    /// Fetch a comment with its parent reference populated one level deep.
    /// Deeper ancestors stay unresolved; repeated calls walk the chain.
    pub async fn get_comment_populated(&self, id: &str) -> Result<Comment, DatabaseError> {
        let mut comment = self.get_comment(id).await?;
        if let Some(parent_ref) = &mut comment.parent {
            if let Some(parent_id) = parent_ref.id().map(ToOwned::to_owned) {
                *parent_ref = Ref::resolved(self.get_comment(&parent_id).await?);
            }
        }
        Ok(comment)
    }
}
