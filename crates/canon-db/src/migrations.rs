//! Collection table setup.
//!
//! DDL is derived from the schema registry rather than a static migration
//! file: every registered binding gets one document table named after its
//! collection (legacy casing preserved, hence the quoting). All statements
//! use `IF NOT EXISTS` for idempotent re-running.

use crate::error::DatabaseError;
use crate::service::CanonService;

fn collection_ddl(collection: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS "{collection}" (
    id TEXT PRIMARY KEY,
    doc TEXT NOT NULL,
    rev INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    expiration TEXT
);
CREATE INDEX IF NOT EXISTS "idx_{collection}_expiration" ON "{collection}" (expiration);
"#
    )
}

impl CanonService {
    /// Create one document table per registered binding.
    pub(crate) async fn ensure_collections(&self) -> Result<(), DatabaseError> {
        for binding in self.schema().bindings() {
            self.db()
                .conn()
                .execute_batch(&collection_ddl(binding.collection()))
                .await
                .map_err(|e| {
                    DatabaseError::Migration(format!("{}: {e}", binding.collection()))
                })?;
        }
        Ok(())
    }
}
