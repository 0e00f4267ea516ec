//! Version lifecycle orchestration: create, list, diff, restore, auto-save.

use std::sync::Arc;

use draftline_core::autosave::{AutoSavePolicy, AUTOSAVE_DESCRIPTION};
use draftline_core::diff::{compute_diff, render_html, render_text};
use draftline_core::error::CoreError;
use draftline_core::similarity::similarity;
use draftline_core::types::DbId;
use draftline_core::versioning::{
    clamp_limit, restore_description, validate_change_description, validate_content,
    DEFAULT_VERSION_LIST_LIMIT, MAX_VERSION_LIST_LIMIT,
};
use draftline_db::models::document::Document;
use draftline_db::models::document_version::{CreateDocumentVersion, DocumentVersion};
use serde::Serialize;

use crate::store::{DocumentStore, VersionStore};

/// How many times an append is retried after losing a version-number race.
const APPEND_RETRY_ATTEMPTS: u32 = 3;

/// A rendered diff between two versions of a document.
///
/// `version_a` is always the lower version number regardless of the order
/// the caller supplied, so diffs always read old-to-new.
#[derive(Debug, Clone, Serialize)]
pub struct VersionDiff {
    pub document_id: DbId,
    pub version_a: i32,
    pub version_b: i32,
    pub html: String,
    pub text: String,
    /// Fraction of `version_b`'s content unchanged from `version_a`.
    pub similarity: f64,
}

/// Orchestrates the version history of documents.
///
/// Holds its collaborators behind trait objects; construct one instance at
/// startup and pass it explicitly (it is cheap to clone).
#[derive(Clone)]
pub struct VersionService {
    versions: Arc<dyn VersionStore>,
    documents: Arc<dyn DocumentStore>,
    autosave: AutoSavePolicy,
}

impl VersionService {
    pub fn new(versions: Arc<dyn VersionStore>, documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            versions,
            documents,
            autosave: AutoSavePolicy::default(),
        }
    }

    /// Override the auto-save similarity threshold.
    pub fn with_autosave_threshold(mut self, threshold: f64) -> Self {
        self.autosave = AutoSavePolicy::new(threshold);
        self
    }

    /// Fetch a document and verify the acting user owns it.
    async fn authorize_document(
        &self,
        document_id: DbId,
        owner_id: DbId,
    ) -> Result<Document, CoreError> {
        let document = self.documents.fetch(document_id).await?.ok_or(
            CoreError::NotFound {
                entity: "Document",
                id: document_id,
            },
        )?;
        if document.owner_id != owner_id {
            return Err(CoreError::Forbidden(format!(
                "Document {document_id} is not owned by user {owner_id}"
            )));
        }
        Ok(document)
    }

    /// Append a version for an already-validated, already-authorized
    /// document. A lost version-number race is retried up to
    /// [`APPEND_RETRY_ATTEMPTS`] times before the `Conflict` is handed to
    /// the caller.
    async fn append_with_retry(
        &self,
        input: CreateDocumentVersion,
    ) -> Result<DocumentVersion, CoreError> {
        let mut last_conflict = None;
        for attempt in 1..=APPEND_RETRY_ATTEMPTS {
            match self.versions.append(&input).await {
                Ok(version) => {
                    tracing::info!(
                        document_id = input.document_id,
                        version_number = version.version_number,
                        user_id = input.owner_id,
                        "Version created"
                    );
                    return Ok(version);
                }
                Err(CoreError::Conflict(msg)) => {
                    tracing::debug!(
                        document_id = input.document_id,
                        attempt,
                        "Version number race lost, retrying"
                    );
                    last_conflict = Some(CoreError::Conflict(msg));
                }
                Err(other) => return Err(other),
            }
        }
        Err(last_conflict.expect("retry loop ran at least once"))
    }

    /// Record a new immutable version of a document.
    ///
    /// Never updates an existing record; a lost version-number race is
    /// retried before the `Conflict` reaches the caller.
    pub async fn create_version(
        &self,
        document_id: DbId,
        owner_id: DbId,
        content: String,
        change_description: Option<String>,
    ) -> Result<DocumentVersion, CoreError> {
        validate_content(&content)?;
        if let Some(ref description) = change_description {
            validate_change_description(description)?;
        }
        self.authorize_document(document_id, owner_id).await?;

        self.append_with_retry(CreateDocumentVersion {
            document_id,
            owner_id,
            content,
            change_description,
        })
        .await
    }

    /// Snapshot a document's current content as a new version.
    ///
    /// This is the explicit-checkpoint path: the content recorded is
    /// whatever the document store currently holds. The single
    /// `authorize_document` call doubles as the content fetch.
    pub async fn checkpoint(
        &self,
        document_id: DbId,
        owner_id: DbId,
        change_description: Option<String>,
    ) -> Result<DocumentVersion, CoreError> {
        if let Some(ref description) = change_description {
            validate_change_description(description)?;
        }
        let document = self.authorize_document(document_id, owner_id).await?;
        validate_content(&document.content)?;

        self.append_with_retry(CreateDocumentVersion {
            document_id,
            owner_id,
            content: document.content,
            change_description,
        })
        .await
    }

    /// List versions newest first. `limit` is clamped to
    /// [`DEFAULT_VERSION_LIST_LIMIT`] / [`MAX_VERSION_LIST_LIMIT`].
    pub async fn list_versions(
        &self,
        document_id: DbId,
        owner_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<DocumentVersion>, CoreError> {
        self.authorize_document(document_id, owner_id).await?;
        let limit = clamp_limit(limit, DEFAULT_VERSION_LIST_LIMIT, MAX_VERSION_LIST_LIMIT);
        self.versions.list(document_id, limit).await
    }

    /// Total number of versions recorded for a document.
    pub async fn count_versions(
        &self,
        document_id: DbId,
        owner_id: DbId,
    ) -> Result<i64, CoreError> {
        self.authorize_document(document_id, owner_id).await?;
        self.versions.count(document_id).await
    }

    /// Point lookup of one version by number.
    pub async fn get_version(
        &self,
        document_id: DbId,
        version_number: i32,
        owner_id: DbId,
    ) -> Result<DocumentVersion, CoreError> {
        self.authorize_document(document_id, owner_id).await?;
        self.versions
            .find_by_number(document_id, version_number)
            .await?
            .ok_or(CoreError::VersionNotFound {
                document_id,
                version_number,
            })
    }

    /// Compute a rendered diff between two versions.
    ///
    /// The pair is normalized so the lower version number is always the old
    /// side; missing versions are reported individually by number.
    pub async fn get_diff(
        &self,
        document_id: DbId,
        version1: i32,
        version2: i32,
        owner_id: DbId,
    ) -> Result<VersionDiff, CoreError> {
        if version1 == version2 {
            return Err(CoreError::Validation(format!(
                "Cannot diff version {version1} against itself"
            )));
        }
        self.authorize_document(document_id, owner_id).await?;

        let low = version1.min(version2);
        let high = version1.max(version2);
        let fetched = self.versions.find_many(document_id, &[low, high]).await?;
        for wanted in [low, high] {
            if !fetched.iter().any(|v| v.version_number == wanted) {
                return Err(CoreError::VersionNotFound {
                    document_id,
                    version_number: wanted,
                });
            }
        }
        // find_many returns ascending order, so [0] is the old side.
        let old = &fetched[0];
        let new = &fetched[1];

        let spans = compute_diff(&old.content, &new.content)?;
        Ok(VersionDiff {
            document_id,
            version_a: old.version_number,
            version_b: new.version_number,
            html: render_html(&spans),
            text: render_text(&spans),
            similarity: similarity(&spans, new.content.chars().count()),
        })
    }

    /// Restore a document to a past version.
    ///
    /// Writes the target version's content back as current content, then
    /// records the restore as a new version. History is never rewritten.
    /// If the write-back succeeds but the version record cannot be created,
    /// the distinct `PartialRestore` error is returned so the caller knows
    /// current content is ahead of history.
    pub async fn restore_version(
        &self,
        document_id: DbId,
        version_number: i32,
        owner_id: DbId,
    ) -> Result<DocumentVersion, CoreError> {
        self.authorize_document(document_id, owner_id).await?;
        let target = self
            .versions
            .find_by_number(document_id, version_number)
            .await?
            .ok_or(CoreError::VersionNotFound {
                document_id,
                version_number,
            })?;

        let updated = self
            .documents
            .set_content(document_id, &target.content)
            .await?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "Document",
                id: document_id,
            });
        }

        match self
            .append_with_retry(CreateDocumentVersion {
                document_id,
                owner_id,
                content: target.content,
                change_description: Some(restore_description(version_number)),
            })
            .await
        {
            Ok(version) => {
                tracing::info!(
                    document_id,
                    restored_from = version_number,
                    new_version = version.version_number,
                    user_id = owner_id,
                    "Version restored"
                );
                Ok(version)
            }
            Err(err) => {
                tracing::error!(
                    document_id,
                    restored_from = version_number,
                    error = %err,
                    "Restore wrote current content but failed to record the restore version"
                );
                Err(CoreError::PartialRestore {
                    document_id,
                    restored_from: version_number,
                })
            }
        }
    }

    /// Whether `content` differs enough from the latest version to persist.
    pub async fn should_save(
        &self,
        document_id: DbId,
        owner_id: DbId,
        content: &str,
    ) -> Result<bool, CoreError> {
        self.authorize_document(document_id, owner_id).await?;
        let last = self.versions.latest(document_id).await?;
        self.autosave
            .should_save(last.as_ref().map(|v| v.content.as_str()), content)
    }

    /// Best-effort automatic checkpoint after an edit.
    ///
    /// Returns the created version if the change was significant. Failures
    /// on this path are logged and swallowed: auto-save is a side channel
    /// and must never fail the caller's edit.
    pub async fn auto_save(
        &self,
        document_id: DbId,
        owner_id: DbId,
        content: &str,
    ) -> Option<DocumentVersion> {
        match self.try_auto_save(document_id, owner_id, content).await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(
                    document_id,
                    user_id = owner_id,
                    error = %err,
                    "Auto-save failed; continuing without a checkpoint"
                );
                None
            }
        }
    }

    async fn try_auto_save(
        &self,
        document_id: DbId,
        owner_id: DbId,
        content: &str,
    ) -> Result<Option<DocumentVersion>, CoreError> {
        validate_content(content)?;
        if !self.should_save(document_id, owner_id, content).await? {
            return Ok(None);
        }
        let version = self
            .append_with_retry(CreateDocumentVersion {
                document_id,
                owner_id,
                content: content.to_string(),
                change_description: Some(AUTOSAVE_DESCRIPTION.to_string()),
            })
            .await?;
        Ok(Some(version))
    }
}
