pub mod document_repo;
pub mod document_version_repo;

pub use document_repo::DocumentRepo;
pub use document_version_repo::DocumentVersionRepo;
