//! Document version models and DTOs.

use draftline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A document version row from the `document_versions` table.
///
/// Rows are immutable once created: the repository exposes no update or
/// delete, and corrections are always expressed as new versions.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: DbId,
    pub document_id: DbId,
    /// User acting at creation time; checked on read paths.
    pub owner_id: DbId,
    /// Per-document ordinal, starting at 1, strictly increasing.
    pub version_number: i32,
    /// Full snapshot of the document text (not a delta).
    pub content: String,
    pub change_description: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for appending a new version to a document's history.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentVersion {
    pub document_id: DbId,
    pub owner_id: DbId,
    pub content: String,
    pub change_description: Option<String>,
}
