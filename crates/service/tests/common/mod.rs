//! In-memory store implementations for service tests.
//!
//! These honor the same contracts as the Postgres stores: appends are
//! atomic per document, version numbers start at 1 and never repeat, and
//! failures surface as the same `CoreError` kinds. Fault injection hooks
//! let tests exercise the conflict-retry and partial-restore paths.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use draftline_core::error::CoreError;
use draftline_core::types::DbId;
use draftline_db::models::document::Document;
use draftline_db::models::document_version::{CreateDocumentVersion, DocumentVersion};
use draftline_service::{DocumentStore, VersionStore};

// ---------------------------------------------------------------------------
// Version store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryVersionStore {
    rows: Mutex<Vec<DocumentVersion>>,
    next_id: AtomicI64,
    conflicts_remaining: AtomicU32,
    unavailable: AtomicBool,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` appends fail with `Conflict`, as if each lost a
    /// version-number race.
    pub fn inject_conflicts(&self, n: u32) {
        self.conflicts_remaining.store(n, Ordering::SeqCst);
    }

    /// Simulate a store outage: all appends fail with `Unavailable`.
    pub fn set_unavailable(&self, on: bool) {
        self.unavailable.store(on, Ordering::SeqCst);
    }
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn append(&self, input: &CreateDocumentVersion) -> Result<DocumentVersion, CoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CoreError::Unavailable("version store offline".into()));
        }
        if self
            .conflicts_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(CoreError::Conflict("injected version number race".into()));
        }

        let mut rows = self.rows.lock().unwrap();
        let version_number = rows
            .iter()
            .filter(|v| v.document_id == input.document_id)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1;
        let version = DocumentVersion {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            document_id: input.document_id,
            owner_id: input.owner_id,
            version_number,
            content: input.content.clone(),
            change_description: input.change_description.clone(),
            created_at: Utc::now(),
        };
        rows.push(version.clone());
        Ok(version)
    }

    async fn next_version_number(&self, document_id: DbId) -> Result<i32, CoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|v| v.document_id == document_id)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1)
    }

    async fn list(&self, document_id: DbId, limit: i64) -> Result<Vec<DocumentVersion>, CoreError> {
        let rows = self.rows.lock().unwrap();
        let mut versions: Vec<_> = rows
            .iter()
            .filter(|v| v.document_id == document_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        versions.truncate(limit.max(0) as usize);
        Ok(versions)
    }

    async fn find_by_number(
        &self,
        document_id: DbId,
        version_number: i32,
    ) -> Result<Option<DocumentVersion>, CoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|v| v.document_id == document_id && v.version_number == version_number)
            .cloned())
    }

    async fn find_many(
        &self,
        document_id: DbId,
        version_numbers: &[i32],
    ) -> Result<Vec<DocumentVersion>, CoreError> {
        let rows = self.rows.lock().unwrap();
        let mut versions: Vec<_> = rows
            .iter()
            .filter(|v| {
                v.document_id == document_id && version_numbers.contains(&v.version_number)
            })
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version_number);
        Ok(versions)
    }

    async fn latest(&self, document_id: DbId) -> Result<Option<DocumentVersion>, CoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|v| v.document_id == document_id)
            .max_by_key(|v| v.version_number)
            .cloned())
    }

    async fn count(&self, document_id: DbId) -> Result<i64, CoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|v| v.document_id == document_id).count() as i64)
    }
}

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: Mutex<Vec<Document>>,
    fetch_count: AtomicU32,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `fetch` calls observed so far.
    pub fn fetches(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn insert(&self, id: DbId, owner_id: DbId, content: &str) {
        let now = Utc::now();
        self.docs.lock().unwrap().push(Document {
            id,
            owner_id,
            title: format!("Document {id}"),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        });
    }

    pub fn content_of(&self, id: DbId) -> Option<String> {
        self.docs
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.content.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn fetch(&self, document_id: DbId) -> Result<Option<Document>, CoreError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == document_id)
            .cloned())
    }

    async fn set_content(&self, document_id: DbId, content: &str) -> Result<bool, CoreError> {
        let mut docs = self.docs.lock().unwrap();
        match docs.iter_mut().find(|d| d.id == document_id) {
            Some(doc) => {
                doc.content = content.to_string();
                doc.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
