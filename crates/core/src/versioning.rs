//! Shared limits and validation for version operations.

use crate::error::CoreError;

/// Maximum document content size in bytes.
///
/// Matches [`crate::diff::MAX_DIFF_INPUT_BYTES`] so every stored version can
/// be diffed against any other.
pub const MAX_CONTENT_LENGTH: usize = 1_048_576;

/// Maximum length for a version change description in characters.
pub const MAX_CHANGE_DESCRIPTION_LENGTH: usize = 1_000;

/// Default number of versions returned by a listing.
pub const DEFAULT_VERSION_LIST_LIMIT: i64 = 50;

/// Hard cap on versions returned by a listing.
pub const MAX_VERSION_LIST_LIMIT: i64 = 200;

/// Validate document content: length check only (empty is a valid document).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.len() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Content exceeds maximum length of {MAX_CONTENT_LENGTH} bytes (got {})",
            content.len()
        )));
    }
    Ok(())
}

/// Validate a change description: length check only.
pub fn validate_change_description(description: &str) -> Result<(), CoreError> {
    let chars = description.chars().count();
    if chars > MAX_CHANGE_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Change description exceeds maximum length of \
             {MAX_CHANGE_DESCRIPTION_LENGTH} characters (got {chars})"
        )));
    }
    Ok(())
}

/// Clamp a user-provided limit to `[1, max]`, applying the default if absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Change description recorded when restoring an older version.
pub fn restore_description(version_number: i32) -> String {
    format!("Restored from version {version_number}")
}
