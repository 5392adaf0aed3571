//! Background removal of expired documents.
//!
//! Bindings carrying the expire plugin give each document an `expiration`
//! timestamp; a document becomes eligible for removal `expires` seconds past
//! that timestamp. The sweep deletes eligible documents in bulk. Timing is
//! eventual: a document may outlive its TTL by up to one sweep interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use canon_config::SweepConfig;

use crate::error::DatabaseError;
use crate::service::CanonService;

impl CanonService {
    /// Remove every eligible document across all expiring bindings. Returns
    /// the number of documents removed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a delete statement fails.
    pub async fn sweep_expired(&self) -> Result<u64, DatabaseError> {
        let mut removed = 0;
        for binding in self.schema().bindings() {
            let Some(expires) = binding.expire_after_secs() else {
                continue;
            };
            let ttl = chrono::Duration::seconds(i64::try_from(expires).unwrap_or(i64::MAX));
            let cutoff = (Utc::now() - ttl).to_rfc3339();

            let count = self
                .db()
                .conn()
                .execute(
                    &format!(
                        r#"DELETE FROM "{}" WHERE expiration IS NOT NULL AND expiration <= ?1"#,
                        binding.collection()
                    ),
                    [cutoff.as_str()],
                )
                .await?;
            if count > 0 {
                tracing::debug!(
                    collection = binding.collection(),
                    removed = count,
                    "expired documents removed"
                );
            }
            removed += count;
        }
        Ok(removed)
    }
}

/// Periodic sweep task. Owns a tokio task that calls
/// [`CanonService::sweep_expired`] at a fixed interval until shut down.
pub struct Sweeper {
    handle: tokio::task::JoinHandle<()>,
}

impl Sweeper {
    /// Spawn a sweeper ticking at `interval`. The first pass runs
    /// immediately.
    #[must_use]
    pub fn spawn(service: Arc<CanonService>, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match service.sweep_expired().await {
                    Ok(0) => {}
                    Ok(removed) => {
                        tracing::info!(removed, "expiration sweep pass complete");
                    }
                    Err(e) => tracing::warn!(error = %e, "expiration sweep failed"),
                }
            }
        });
        Self { handle }
    }

    /// Spawn a sweeper from loaded configuration. Returns `None` when the
    /// sweep is disabled.
    #[must_use]
    pub fn from_config(service: Arc<CanonService>, config: &SweepConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::spawn(service, Duration::from_secs(config.interval_secs)))
    }

    /// Stop the background task.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service_with;
    use canon_core::entities::Comment;
    use canon_schema::{ExpireOptions, SchemaBinding, SchemaRegistry, expire, to_json};
    use serde_json::json;

    fn expiring_registry(expires: u64) -> SchemaRegistry {
        let mut registry = SchemaRegistry::empty();
        registry
            .register(
                SchemaBinding::of::<Comment>("flash_comment", "flash_comments", "cmt")
                    .unwrap()
                    .apply(to_json)
                    .apply(expire(ExpireOptions { expires })),
            )
            .unwrap();
        registry
    }

    fn past(seconds: i64) -> String {
        (Utc::now() - chrono::Duration::seconds(seconds)).to_rfc3339()
    }

    #[tokio::test]
    async fn insert_defaults_expiration_for_expiring_binding() {
        let svc = test_service_with(expiring_registry(60)).await;
        let raw = svc
            .insert_document("flash_comment", json!({ "content": "c", "author": "u" }))
            .await
            .unwrap();
        assert!(raw.get("expiration").is_some());
    }

    #[tokio::test]
    async fn sweep_removes_documents_past_ttl_only() {
        let svc = test_service_with(expiring_registry(60)).await;

        let stale = svc
            .insert_document(
                "flash_comment",
                json!({ "content": "old", "author": "u", "expiration": past(120) }),
            )
            .await
            .unwrap();
        let fresh = svc
            .insert_document("flash_comment", json!({ "content": "new", "author": "u" }))
            .await
            .unwrap();

        // Present immediately after creation.
        assert_eq!(svc.count_documents("flash_comment").await.unwrap(), 2);

        let removed = svc.sweep_expired().await.unwrap();
        assert_eq!(removed, 1);

        let stale_id = stale["_id"].as_str().unwrap();
        let fresh_id = fresh["_id"].as_str().unwrap();
        assert!(matches!(
            svc.raw_document("flash_comment", stale_id).await,
            Err(DatabaseError::NoResult)
        ));
        assert!(svc.raw_document("flash_comment", fresh_id).await.is_ok());
    }

    #[tokio::test]
    async fn null_expiration_patch_clears_the_ttl() {
        let svc = test_service_with(expiring_registry(60)).await;
        let raw = svc
            .insert_document(
                "flash_comment",
                json!({ "content": "c", "author": "u", "expiration": past(120) }),
            )
            .await
            .unwrap();
        let id = raw["_id"].as_str().unwrap();

        let updated = svc
            .update_document("flash_comment", id, json!({ "expiration": null }))
            .await
            .unwrap();
        assert!(updated.get("expiration").is_none());

        assert_eq!(svc.sweep_expired().await.unwrap(), 0);
        assert!(svc.raw_document("flash_comment", id).await.is_ok());
    }

    #[tokio::test]
    async fn non_datetime_expiration_is_rejected() {
        let svc = test_service_with(expiring_registry(60)).await;

        let result = svc
            .insert_document(
                "flash_comment",
                json!({ "content": "c", "author": "u", "expiration": "tomorrow" }),
            )
            .await;
        assert!(result.is_err());

        let raw = svc
            .insert_document("flash_comment", json!({ "content": "c", "author": "u" }))
            .await
            .unwrap();
        let id = raw["_id"].as_str().unwrap();
        let result = svc
            .update_document("flash_comment", id, json!({ "expiration": 42 }))
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn expiration_is_normalized_to_utc() {
        let svc = test_service_with(expiring_registry(60)).await;
        let raw = svc
            .insert_document(
                "flash_comment",
                json!({
                    "content": "c",
                    "author": "u",
                    "expiration": "2026-01-01T12:00:00+02:00"
                }),
            )
            .await
            .unwrap();
        assert_eq!(raw["expiration"], "2026-01-01T10:00:00+00:00");
    }

    #[tokio::test]
    async fn sweep_ignores_non_expiring_bindings() {
        let svc = crate::test_support::helpers::test_service().await;
        svc.create_theory("t", "c").await.unwrap();
        let removed = svc.sweep_expired().await.unwrap();
        assert_eq!(removed, 0);
        assert_eq!(svc.count_documents("theory").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sweeper_removes_in_background() {
        let svc = Arc::new(test_service_with(expiring_registry(1)).await);
        svc.insert_document(
            "flash_comment",
            json!({ "content": "old", "author": "u", "expiration": past(30) }),
        )
        .await
        .unwrap();

        let sweeper = Sweeper::spawn(Arc::clone(&svc), Duration::from_millis(50));

        let mut remaining = 1;
        for _ in 0..40 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            remaining = svc.count_documents("flash_comment").await.unwrap();
            if remaining == 0 {
                break;
            }
        }
        sweeper.shutdown();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn disabled_config_spawns_no_sweeper() {
        let svc = Arc::new(crate::test_support::helpers::test_service().await);
        let config = SweepConfig {
            enabled: false,
            interval_secs: 60,
        };
        assert!(Sweeper::from_config(svc, &config).is_none());
    }
}
