pub mod health;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /documents/{id}/versions                        list (GET), checkpoint (POST)
/// /documents/{id}/versions/{number}               get version
/// /documents/{id}/versions/{number}/diff/{other}  rendered diff
/// /documents/{id}/versions/{number}/restore       restore (POST)
/// /documents/{id}/autosave                        auto-save (POST)
/// ```
///
/// All routes require a Bearer token; handlers take the [`AuthUser`]
/// extractor directly.
///
/// [`AuthUser`]: crate::middleware::auth::AuthUser
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/documents", versions::document_version_router())
}
