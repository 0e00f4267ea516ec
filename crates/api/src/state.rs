use std::sync::Arc;

use draftline_service::VersionService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The version service is constructed once in `main` with its
/// stores injected; handlers never build their own.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: draftline_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Version history orchestrator.
    pub versions: VersionService,
}
