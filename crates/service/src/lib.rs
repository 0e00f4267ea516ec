//! Orchestration layer for the version history engine.
//!
//! [`VersionService`] is constructed once at process start with its two
//! collaborators injected (the version store and the document store) and is
//! passed explicitly wherever it is needed; there is no global state.

pub mod store;
pub mod version_service;

pub use store::{DocumentStore, PgDocumentStore, PgVersionStore, VersionStore};
pub use version_service::{VersionDiff, VersionService};
