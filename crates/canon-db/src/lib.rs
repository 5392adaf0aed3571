//! # canon-db
//!
//! libSQL-backed document store for the Canon persistence layer.
//!
//! Each registered schema binding maps to one table holding JSON documents
//! (`id`, `doc`, `rev`, timestamps, optional `expiration`). The store
//! validates insert payloads against the schema registry, keeps timestamps
//! automatically, resolves references on explicit population, and removes
//! expired documents through a background sweep.
//!
//! Uses the `libsql` crate (C `SQLite` fork) as the embedded store;
//! `:memory:` databases back the test suites.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod sweep;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Raw database handle: connection plus ID generation.
///
/// Collection tables are created by [`service::CanonService`] from its schema
/// registry, not here; `CanonDb` knows nothing about record shapes.
pub struct CanonDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl CanonDb {
    /// Open a local-only database at the given path (`":memory:"` for tests).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        Ok(Self { db, conn })
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed document ID, e.g. `"cmt-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
