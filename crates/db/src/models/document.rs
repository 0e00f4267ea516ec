//! Document models and DTOs.
//!
//! Documents themselves belong to the document-store collaborator; the rows
//! here back its `PgDocumentStore` implementation and carry the ownership
//! information the version engine authorizes against.

use draftline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A document row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Document {
    pub id: DbId,
    /// Identity of the owning user, resolved by the external auth provider.
    pub owner_id: DbId,
    pub title: String,
    /// Current content; after a restore this equals the newest version's
    /// content for the document.
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
