pub mod document;
pub mod document_version;
