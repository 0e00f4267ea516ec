//! Handlers for document version history.
//!
//! Provides endpoints for checkpointing, listing, fetching, diffing and
//! restoring document versions, plus the auto-save endpoint used by editors
//! after each debounce window.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use serde::{Deserialize, Serialize};

use draftline_core::types::DbId;
use draftline_db::models::document_version::DocumentVersion;
use draftline_service::VersionDiff;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Pagination parameters for version listings.
#[derive(Debug, Deserialize)]
pub struct VersionListParams {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Request body for creating a checkpoint of the current document content.
#[derive(Debug, Deserialize)]
pub struct CreateVersionRequest {
    pub change_description: Option<String>,
}

/// Request body for the auto-save endpoint.
#[derive(Debug, Deserialize)]
pub struct AutoSaveRequest {
    pub content: String,
}

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// Response payload for version listings.
#[derive(Debug, Serialize)]
pub struct VersionListResponse {
    pub document_id: DbId,
    /// Total versions recorded, independent of `limit`.
    pub total: i64,
    pub versions: Vec<DocumentVersion>,
}

/// Response payload for the auto-save endpoint.
#[derive(Debug, Serialize)]
pub struct AutoSaveResponse {
    /// Whether the content was different enough to record a version.
    pub saved: bool,
    pub version: Option<DocumentVersion>,
}

// ---------------------------------------------------------------------------
// POST /documents/{id}/versions
// ---------------------------------------------------------------------------

/// Snapshot the document's current content as a new version.
pub async fn create_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(document_id): Path<DbId>,
    Json(body): Json<CreateVersionRequest>,
) -> AppResult<impl IntoResponse> {
    let version = state
        .versions
        .checkpoint(document_id, auth.user_id, body.change_description)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

// ---------------------------------------------------------------------------
// GET /documents/{id}/versions
// ---------------------------------------------------------------------------

/// List a document's versions, newest first.
pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(document_id): Path<DbId>,
    Query(params): Query<VersionListParams>,
) -> AppResult<impl IntoResponse> {
    let versions = state
        .versions
        .list_versions(document_id, auth.user_id, params.limit)
        .await?;
    let total = state
        .versions
        .count_versions(document_id, auth.user_id)
        .await?;

    tracing::debug!(count = versions.len(), document_id, "Listed versions");

    Ok(Json(DataResponse {
        data: VersionListResponse {
            document_id,
            total,
            versions,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /documents/{id}/versions/{number}
// ---------------------------------------------------------------------------

/// Fetch a single version by number.
pub async fn get_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((document_id, version_number)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let version = state
        .versions
        .get_version(document_id, version_number, auth.user_id)
        .await?;

    Ok(Json(DataResponse { data: version }))
}

// ---------------------------------------------------------------------------
// GET /documents/{id}/versions/{number}/diff/{other}
// ---------------------------------------------------------------------------

/// Compute a rendered diff between two versions of a document.
pub async fn diff_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((document_id, version_a, version_b)): Path<(DbId, i32, i32)>,
) -> AppResult<impl IntoResponse> {
    let diff: VersionDiff = state
        .versions
        .get_diff(document_id, version_a, version_b, auth.user_id)
        .await?;

    Ok(Json(DataResponse { data: diff }))
}

// ---------------------------------------------------------------------------
// POST /documents/{id}/versions/{number}/restore
// ---------------------------------------------------------------------------

/// Restore the document to a past version.
///
/// The old content is written back as current content and the restore is
/// recorded as a new version with a higher number; history is never
/// rewritten.
pub async fn restore_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((document_id, version_number)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let version = state
        .versions
        .restore_version(document_id, version_number, auth.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

// ---------------------------------------------------------------------------
// POST /documents/{id}/autosave
// ---------------------------------------------------------------------------

/// Best-effort auto-save of in-flight editor content.
///
/// Records a version only when the content differs enough from the latest
/// one. Store failures on this path are swallowed by the service, so the
/// endpoint reports `saved: false` rather than an error.
pub async fn auto_save(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(document_id): Path<DbId>,
    Json(body): Json<AutoSaveRequest>,
) -> AppResult<impl IntoResponse> {
    let version = state
        .versions
        .auto_save(document_id, auth.user_id, &body.content)
        .await;

    Ok(Json(DataResponse {
        data: AutoSaveResponse {
            saved: version.is_some(),
            version,
        },
    }))
}
