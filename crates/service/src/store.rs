//! Store seams for the version engine and their PostgreSQL implementations.
//!
//! `VersionStore` is the persistence boundary for the append-only history;
//! `DocumentStore` is the current-content collaborator used by restore and
//! auto-save. Both are object-safe traits so the service can be wired to
//! Postgres in production and to in-memory implementations in tests.

use async_trait::async_trait;
use draftline_core::error::CoreError;
use draftline_core::types::DbId;
use draftline_db::models::document::Document;
use draftline_db::models::document_version::{CreateDocumentVersion, DocumentVersion};
use draftline_db::repositories::{DocumentRepo, DocumentVersionRepo};
use draftline_db::DbPool;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Append-only ledger of versions keyed by document id.
///
/// Implementations must guarantee that two concurrent [`append`] calls for
/// the same document never persist the same `version_number`; a lost race
/// is reported as [`CoreError::Conflict`] and the caller retries.
///
/// [`append`]: VersionStore::append
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Insert a new immutable version record with the next version number.
    async fn append(&self, input: &CreateDocumentVersion) -> Result<DocumentVersion, CoreError>;

    /// The version number the next append would receive. Advisory.
    async fn next_version_number(&self, document_id: DbId) -> Result<i32, CoreError>;

    /// List versions newest first, up to `limit`.
    async fn list(&self, document_id: DbId, limit: i64) -> Result<Vec<DocumentVersion>, CoreError>;

    /// Point lookup by per-document version number.
    async fn find_by_number(
        &self,
        document_id: DbId,
        version_number: i32,
    ) -> Result<Option<DocumentVersion>, CoreError>;

    /// Fetch several versions by number, ascending; missing numbers are
    /// absent from the result rather than an error.
    async fn find_many(
        &self,
        document_id: DbId,
        version_numbers: &[i32],
    ) -> Result<Vec<DocumentVersion>, CoreError>;

    /// The most recently created version, if any.
    async fn latest(&self, document_id: DbId) -> Result<Option<DocumentVersion>, CoreError>;

    /// Total number of versions recorded for a document.
    async fn count(&self, document_id: DbId) -> Result<i64, CoreError>;
}

/// Current-content side of the document store collaborator.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document (including its owner and current content).
    async fn fetch(&self, document_id: DbId) -> Result<Option<Document>, CoreError>;

    /// Overwrite a document's current content. Returns `false` if the
    /// document does not exist.
    async fn set_content(&self, document_id: DbId, content: &str) -> Result<bool, CoreError>;
}

// ---------------------------------------------------------------------------
// Error translation
// ---------------------------------------------------------------------------

/// Map a sqlx error onto the core error kinds.
///
/// A 23505 on a `uq_`-prefixed constraint is a version-number race
/// (`Conflict`, retryable); everything else means the store failed us.
fn map_store_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Version number already taken (constraint {constraint})"
                ));
            }
            CoreError::Unavailable(err.to_string())
        }
        _ => CoreError::Unavailable(err.to_string()),
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL implementations
// ---------------------------------------------------------------------------

/// [`VersionStore`] backed by the `document_versions` table.
#[derive(Clone)]
pub struct PgVersionStore {
    pool: DbPool,
}

impl PgVersionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionStore for PgVersionStore {
    async fn append(&self, input: &CreateDocumentVersion) -> Result<DocumentVersion, CoreError> {
        DocumentVersionRepo::create(&self.pool, input)
            .await
            .map_err(map_store_error)
    }

    async fn next_version_number(&self, document_id: DbId) -> Result<i32, CoreError> {
        DocumentVersionRepo::next_version_number(&self.pool, document_id)
            .await
            .map_err(map_store_error)
    }

    async fn list(&self, document_id: DbId, limit: i64) -> Result<Vec<DocumentVersion>, CoreError> {
        DocumentVersionRepo::list_for_document(&self.pool, document_id, limit)
            .await
            .map_err(map_store_error)
    }

    async fn find_by_number(
        &self,
        document_id: DbId,
        version_number: i32,
    ) -> Result<Option<DocumentVersion>, CoreError> {
        DocumentVersionRepo::find_by_number(&self.pool, document_id, version_number)
            .await
            .map_err(map_store_error)
    }

    async fn find_many(
        &self,
        document_id: DbId,
        version_numbers: &[i32],
    ) -> Result<Vec<DocumentVersion>, CoreError> {
        DocumentVersionRepo::find_many_by_numbers(&self.pool, document_id, version_numbers)
            .await
            .map_err(map_store_error)
    }

    async fn latest(&self, document_id: DbId) -> Result<Option<DocumentVersion>, CoreError> {
        DocumentVersionRepo::get_latest(&self.pool, document_id)
            .await
            .map_err(map_store_error)
    }

    async fn count(&self, document_id: DbId) -> Result<i64, CoreError> {
        DocumentVersionRepo::count_for_document(&self.pool, document_id)
            .await
            .map_err(map_store_error)
    }
}

/// [`DocumentStore`] backed by the `documents` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: DbPool,
}

impl PgDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn fetch(&self, document_id: DbId) -> Result<Option<Document>, CoreError> {
        DocumentRepo::find_by_id(&self.pool, document_id)
            .await
            .map_err(map_store_error)
    }

    async fn set_content(&self, document_id: DbId, content: &str) -> Result<bool, CoreError> {
        let updated = DocumentRepo::set_content(&self.pool, document_id, content)
            .await
            .map_err(map_store_error)?;
        Ok(updated.is_some())
    }
}
