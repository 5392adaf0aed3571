//! Database error types for canon-db.

use thiserror::Error;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Collection setup failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a document but none was found.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., non-object payload).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Schema lookup or validation failure, propagated unmodified.
    #[error(transparent)]
    Schema(#[from] canon_schema::SchemaError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
