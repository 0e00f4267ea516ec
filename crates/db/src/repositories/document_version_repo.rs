//! Repository for the append-only `document_versions` table.

use draftline_core::types::DbId;
use sqlx::PgPool;

use crate::models::document_version::{CreateDocumentVersion, DocumentVersion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, document_id, owner_id, version_number, content, change_description, created_at";

/// Append and read operations for document versions.
///
/// There is deliberately no update or delete: history is immutable and
/// corrections are recorded as new versions.
pub struct DocumentVersionRepo;

impl DocumentVersionRepo {
    /// Append a new version, auto-assigning the next version number for the
    /// document in the same statement.
    ///
    /// The `(SELECT COALESCE(MAX(version_number), 0) + 1 ...)` subquery and
    /// the `uq_document_versions_document_version` unique constraint
    /// together serialize concurrent appends per document: a lost race
    /// surfaces as a 23505 database error rather than a duplicate or
    /// skipped number.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocumentVersion,
    ) -> Result<DocumentVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_versions
                (document_id, owner_id, version_number, content, change_description)
             VALUES (
                $1,
                $2,
                (SELECT COALESCE(MAX(version_number), 0) + 1
                   FROM document_versions WHERE document_id = $1),
                $3, $4
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(input.document_id)
            .bind(input.owner_id)
            .bind(&input.content)
            .bind(&input.change_description)
            .fetch_one(pool)
            .await
    }

    /// Get the next version number for a document (max existing + 1, or 1
    /// if none). Advisory only: the authoritative assignment happens inside
    /// [`DocumentVersionRepo::create`].
    pub async fn next_version_number(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version_number), 0) + 1
             FROM document_versions WHERE document_id = $1",
        )
        .bind(document_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Find a specific version by document and version number.
    pub async fn find_by_number(
        pool: &PgPool,
        document_id: DbId,
        version_number: i32,
    ) -> Result<Option<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions
             WHERE document_id = $1 AND version_number = $2"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .bind(version_number)
            .fetch_optional(pool)
            .await
    }

    /// List versions for a document, newest first, up to `limit` rows.
    pub async fn list_for_document(
        pool: &PgPool,
        document_id: DbId,
        limit: i64,
    ) -> Result<Vec<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions
             WHERE document_id = $1
             ORDER BY version_number DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Fetch several versions of one document by number, used for diffing.
    /// Returned in ascending version order; missing numbers are simply
    /// absent from the result.
    pub async fn find_many_by_numbers(
        pool: &PgPool,
        document_id: DbId,
        version_numbers: &[i32],
    ) -> Result<Vec<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions
             WHERE document_id = $1 AND version_number = ANY($2)
             ORDER BY version_number ASC"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .bind(version_numbers)
            .fetch_all(pool)
            .await
    }

    /// Get the latest (highest version number) version for a document.
    pub async fn get_latest(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Option<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions
             WHERE document_id = $1
             ORDER BY version_number DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .fetch_optional(pool)
            .await
    }

    /// Count the total number of versions for a document.
    pub async fn count_for_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM document_versions WHERE document_id = $1")
                .bind(document_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
