//! Service layer orchestrating validated document CRUD.
//!
//! `CanonService` wraps `CanonDb` (raw database access) and `SchemaRegistry`
//! (record shapes and collection layout). Generic document operations live
//! here; typed per-entity methods are implemented as `impl CanonService` in
//! `repos/`.
//!
//! Every insert follows this protocol:
//! 1. Default the `expiration` field for expiring bindings
//! 2. Validate the payload against the registered schema
//! 3. Generate a prefixed ID and stamp `createdAt`/`updatedAt`
//! 4. Insert into the binding's collection table

use chrono::Utc;
use serde_json::{Map, Value};

use canon_config::CanonConfig;
use canon_schema::{SchemaBinding, SchemaError, SchemaRegistry, serialize};

use crate::CanonDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};

/// Orchestrates document mutations with schema validation.
pub struct CanonService {
    db: CanonDb,
    schema: SchemaRegistry,
}

impl CanonService {
    /// Open a local database and register the canonical schemas.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for
    ///   tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or collection
    /// setup fails.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = CanonDb::open_local(db_path).await?;
        Self::from_parts(db, SchemaRegistry::new()).await
    }

    /// Open the store described by a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or collection
    /// setup fails.
    pub async fn from_config(config: &CanonConfig) -> Result<Self, DatabaseError> {
        Self::new_local(&config.database.path).await
    }

    /// Build a service from an existing database and a caller-composed
    /// registry, creating any missing collection tables.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if collection setup fails.
    pub async fn from_parts(db: CanonDb, schema: SchemaRegistry) -> Result<Self, DatabaseError> {
        let service = Self { db, schema };
        service.ensure_collections().await?;
        Ok(service)
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &CanonDb {
        &self.db
    }

    /// Access the schema registry.
    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    fn binding(&self, name: &str) -> Result<&SchemaBinding, DatabaseError> {
        self.schema
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()).into())
    }

    /// Insert a document under the named binding and return its raw envelope.
    ///
    /// The payload holds record fields only; `id`, `createdAt`, and
    /// `updatedAt` are store-managed. For expiring bindings a missing
    /// `expiration` field defaults to the insert time.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Schema` when validation fails — a missing
    /// required field produces an error naming that field — or
    /// `DatabaseError::InvalidState` when the payload is not a JSON object.
    pub async fn insert_document(
        &self,
        name: &str,
        mut payload: Value,
    ) -> Result<Value, DatabaseError> {
        let binding = self.binding(name)?;
        let Some(fields) = payload.as_object_mut() else {
            return Err(DatabaseError::InvalidState(
                "insert payload must be a JSON object".into(),
            ));
        };

        if binding.expire_after_secs().is_some() && !fields.contains_key("expiration") {
            fields.insert("expiration".to_string(), Value::String(Utc::now().to_rfc3339()));
        }

        self.schema.validate(name, &payload)?;

        let Some(fields) = payload.as_object_mut() else {
            return Err(DatabaseError::InvalidState(
                "insert payload must be a JSON object".into(),
            ));
        };
        let expiration = match fields.remove("expiration") {
            Some(value) => Self::normalize_expiration(&value)?,
            None => None,
        };

        let id = self.db.generate_id(binding.id_prefix()).await?;
        let now = Utc::now().to_rfc3339();
        let doc = serde_json::to_string(&payload).map_err(|e| DatabaseError::Other(e.into()))?;

        self.db
            .conn()
            .execute(
                &format!(
                    r#"INSERT INTO "{}" (id, doc, rev, created_at, updated_at, expiration)
                       VALUES (?1, ?2, 1, ?3, ?4, ?5)"#,
                    binding.collection()
                ),
                libsql::params![
                    id.as_str(),
                    doc.as_str(),
                    now.as_str(),
                    now.as_str(),
                    expiration.as_deref()
                ],
            )
            .await?;

        tracing::debug!(collection = binding.collection(), id = %id, "document inserted");
        self.raw_document(name, &id).await
    }

    /// Fetch the raw envelope of a document: `_id`, `_rev`, the stored
    /// fields, timestamps, and `expiration` when set.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the document does not exist.
    pub async fn raw_document(&self, name: &str, id: &str) -> Result<Value, DatabaseError> {
        let binding = self.binding(name)?;
        let mut rows = self
            .db
            .conn()
            .query(
                &format!(
                    r#"SELECT doc, rev, created_at, updated_at, expiration FROM "{}" WHERE id = ?1"#,
                    binding.collection()
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Self::row_to_envelope(id, &row)
    }

    /// Fetch a document in its outbound JSON form: normalized (internal
    /// fields stripped, virtual `id` exposed) when the binding carries the
    /// `to_json` plugin, raw otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the document does not exist.
    pub async fn document_json(&self, name: &str, id: &str) -> Result<Value, DatabaseError> {
        let raw = self.raw_document(name, id).await?;
        if self.binding(name)?.normalize_output() {
            Ok(serialize::normalize(&raw))
        } else {
            Ok(raw)
        }
    }

    /// Merge a partial patch into a document's fields, re-validate, bump the
    /// revision, and refresh `updatedAt`. Returns the updated raw envelope.
    ///
    /// A `null` patch value sets the field to null; absent keys are left
    /// untouched. `expiration` is special-cased: absent keeps the stored
    /// value, `null` clears it, a date-time string replaces it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the document does not exist, or
    /// `DatabaseError::Schema` when the merged document fails validation.
    pub async fn update_document(
        &self,
        name: &str,
        id: &str,
        patch: Value,
    ) -> Result<Value, DatabaseError> {
        let binding = self.binding(name)?;
        let Value::Object(patch) = patch else {
            return Err(DatabaseError::InvalidState(
                "update patch must be a JSON object".into(),
            ));
        };

        let current = self.raw_document(name, id).await?;
        let mut fields = match current {
            Value::Object(map) => map,
            _ => return Err(DatabaseError::InvalidState("stored document is not an object".into())),
        };
        fields.retain(|k, _| !k.starts_with('_'));
        fields.remove("createdAt");
        fields.remove("updatedAt");

        // Tri-state: absent keeps the stored expiration, null clears it, a
        // date-time string replaces it.
        let mut expiration_patch = None;
        for (key, value) in patch {
            if key == "expiration" {
                expiration_patch = Some(Self::normalize_expiration(&value)?);
                continue;
            }
            fields.insert(key, value);
        }
        fields.remove("expiration");

        let merged = Value::Object(fields);
        self.schema.validate(name, &merged)?;
        let doc = serde_json::to_string(&merged).map_err(|e| DatabaseError::Other(e.into()))?;
        let now = Utc::now().to_rfc3339();

        let changed = match expiration_patch {
            Some(expiration) => {
                self.db
                    .conn()
                    .execute(
                        &format!(
                            r#"UPDATE "{}" SET doc = ?2, rev = rev + 1, updated_at = ?3,
                               expiration = ?4 WHERE id = ?1"#,
                            binding.collection()
                        ),
                        libsql::params![id, doc.as_str(), now.as_str(), expiration.as_deref()],
                    )
                    .await?
            }
            None => {
                self.db
                    .conn()
                    .execute(
                        &format!(
                            r#"UPDATE "{}" SET doc = ?2, rev = rev + 1, updated_at = ?3
                               WHERE id = ?1"#,
                            binding.collection()
                        ),
                        libsql::params![id, doc.as_str(), now.as_str()],
                    )
                    .await?
            }
        };
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        tracing::debug!(collection = binding.collection(), id = %id, "document updated");
        self.raw_document(name, id).await
    }

    /// Remove a document. Removing an already-absent document is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete statement fails.
    pub async fn delete_document(&self, name: &str, id: &str) -> Result<(), DatabaseError> {
        let binding = self.binding(name)?;
        self.db
            .conn()
            .execute(
                &format!(r#"DELETE FROM "{}" WHERE id = ?1"#, binding.collection()),
                [id],
            )
            .await?;
        tracing::debug!(collection = binding.collection(), id = %id, "document deleted");
        Ok(())
    }

    /// List raw envelopes of a binding's documents, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_documents(
        &self,
        name: &str,
        limit: u32,
    ) -> Result<Vec<Value>, DatabaseError> {
        let binding = self.binding(name)?;
        let mut rows = self
            .db
            .conn()
            .query(
                &format!(
                    r#"SELECT id, doc, rev, created_at, updated_at, expiration FROM "{}"
                       ORDER BY created_at DESC LIMIT ?1"#,
                    binding.collection()
                ),
                [i64::from(limit)],
            )
            .await?;

        let mut documents = Vec::new();
        while let Some(row) = rows.next().await? {
            let id = row.get::<String>(0)?;
            let doc = row.get::<String>(1)?;
            let rev = row.get::<i64>(2)?;
            let created_at = row.get::<String>(3)?;
            let updated_at = row.get::<String>(4)?;
            let expiration = get_opt_string(&row, 5)?;
            documents.push(Self::envelope(
                &id, rev, &doc, &created_at, &updated_at, expiration,
            )?);
        }
        Ok(documents)
    }

    /// Number of documents under a binding.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_documents(&self, name: &str) -> Result<u64, DatabaseError> {
        let binding = self.binding(name)?;
        let mut rows = self
            .db
            .conn()
            .query(
                &format!(r#"SELECT COUNT(*) FROM "{}""#, binding.collection()),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Parse and normalize a caller-supplied `expiration` value to UTC
    /// RFC 3339 text. `null` clears it. Normalizing to a single offset keeps
    /// the sweep's lexicographic timestamp comparison sound.
    fn normalize_expiration(value: &Value) -> Result<Option<String>, DatabaseError> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(parse_datetime(s)?.to_rfc3339())),
            _ => Err(DatabaseError::InvalidState(
                "expiration must be a date-time string or null".into(),
            )),
        }
    }

    fn row_to_envelope(id: &str, row: &libsql::Row) -> Result<Value, DatabaseError> {
        let doc = row.get::<String>(0)?;
        let rev = row.get::<i64>(1)?;
        let created_at = row.get::<String>(2)?;
        let updated_at = row.get::<String>(3)?;
        let expiration = get_opt_string(row, 4)?;
        Self::envelope(id, rev, &doc, &created_at, &updated_at, expiration)
    }

    fn envelope(
        id: &str,
        rev: i64,
        doc: &str,
        created_at: &str,
        updated_at: &str,
        expiration: Option<String>,
    ) -> Result<Value, DatabaseError> {
        let fields: Map<String, Value> = serde_json::from_str(doc)
            .map_err(|e| DatabaseError::Query(format!("Invalid JSON in doc column: {e}")))?;

        let mut out = Map::with_capacity(fields.len() + 5);
        out.insert("_id".to_string(), Value::String(id.to_string()));
        out.insert("_rev".to_string(), Value::Number(rev.into()));
        out.extend(fields);
        out.insert(
            "createdAt".to_string(),
            Value::String(parse_datetime(created_at)?.to_rfc3339()),
        );
        out.insert(
            "updatedAt".to_string(),
            Value::String(parse_datetime(updated_at)?.to_rfc3339()),
        );
        if let Some(expiration) = expiration {
            out.insert("expiration".to_string(), Value::String(expiration));
        }
        Ok(Value::Object(out))
    }
}
