//! Route definitions for document version history.
//!
//! ```text
//! DOCUMENT VERSIONS (merged into /documents):
//! GET    /{id}/versions                       list_versions
//! POST   /{id}/versions                       create_version
//! GET    /{id}/versions/{number}              get_version
//! GET    /{id}/versions/{number}/diff/{other} diff_versions
//! POST   /{id}/versions/{number}/restore      restore_version
//! POST   /{id}/autosave                       auto_save
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

/// Document-scoped version routes -- merged into `/documents`.
pub fn document_version_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/versions",
            get(versions::list_versions).post(versions::create_version),
        )
        .route("/{id}/versions/{number}", get(versions::get_version))
        .route(
            "/{id}/versions/{number}/diff/{other}",
            get(versions::diff_versions),
        )
        .route(
            "/{id}/versions/{number}/restore",
            post(versions::restore_version),
        )
        .route("/{id}/autosave", post(versions::auto_save))
}
