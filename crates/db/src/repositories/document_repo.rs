//! Repository for the `documents` table.

use draftline_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::Document;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, content, created_at, updated_at";

/// Provides lookup and current-content operations for documents.
///
/// Document creation and deletion belong to the document-management side of
/// the system; the version engine only reads documents and writes content
/// back on restore.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Find a document by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite a document's current content. Returns the updated row, or
    /// `None` if no document with the given `id` exists.
    pub async fn set_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET content = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }
}
