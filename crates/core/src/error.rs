use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A specific version number is absent from a document's history.
    ///
    /// Kept separate from [`CoreError::NotFound`] so diff failures can
    /// report exactly which version number could not be found.
    #[error("Version {version_number} not found for document {document_id}")]
    VersionNotFound {
        document_id: DbId,
        version_number: i32,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The backing store could not be reached or failed mid-operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A restore wrote the document's current content but failed to record
    /// the restore version, leaving current content ahead of history.
    /// Callers must surface this for manual reconciliation.
    #[error(
        "Partial restore of document {document_id}: content was restored from \
         version {restored_from} but the restore version could not be recorded"
    )]
    PartialRestore {
        document_id: DbId,
        restored_from: i32,
    },
}
