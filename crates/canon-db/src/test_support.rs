//! Shared test utilities for canon-db tests.

#[cfg(test)]
pub(crate) mod helpers {
    use canon_schema::SchemaRegistry;

    use crate::CanonDb;
    use crate::service::CanonService;

    /// Create an in-memory service with the canonical registry.
    pub async fn test_service() -> CanonService {
        CanonService::new_local(":memory:").await.unwrap()
    }

    /// Create an in-memory service with a caller-composed registry.
    pub async fn test_service_with(registry: SchemaRegistry) -> CanonService {
        let db = CanonDb::open_local(":memory:").await.unwrap();
        CanonService::from_parts(db, registry).await.unwrap()
    }
}
