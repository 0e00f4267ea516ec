//! Auto-save significance policy.
//!
//! Decides whether an edit differs enough from the last recorded version to
//! be worth persisting, so keystroke-level autosave triggers do not flood
//! the history with near-identical checkpoints.

use crate::diff::compute_diff;
use crate::error::CoreError;
use crate::similarity::similarity;

/// Default similarity threshold: save only when the candidate is less than
/// 95% similar to the last version.
pub const DEFAULT_AUTOSAVE_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Change description recorded on automatically saved versions.
pub const AUTOSAVE_DESCRIPTION: &str = "Auto-saved version";

/// Threshold-based significance policy.
#[derive(Debug, Clone, Copy)]
pub struct AutoSavePolicy {
    threshold: f64,
}

impl Default for AutoSavePolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_AUTOSAVE_SIMILARITY_THRESHOLD,
        }
    }
}

impl AutoSavePolicy {
    /// Create a policy with a custom similarity threshold in `[0, 1]`.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decide whether `candidate` should be persisted as a new version.
    ///
    /// With no prior version history always saves (bootstraps the chain).
    /// Otherwise computes a diff against the last version's content and
    /// saves iff similarity is below the threshold.
    pub fn should_save(
        &self,
        last_content: Option<&str>,
        candidate: &str,
    ) -> Result<bool, CoreError> {
        let Some(last) = last_content else {
            return Ok(true);
        };
        let spans = compute_diff(last, candidate)?;
        let score = similarity(&spans, candidate.chars().count());
        Ok(score < self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_unconditionally_without_history() {
        let policy = AutoSavePolicy::default();
        assert!(policy.should_save(None, "first draft").unwrap());
        assert!(policy.should_save(None, "").unwrap());
    }

    #[test]
    fn identical_content_not_saved() {
        let policy = AutoSavePolicy::default();
        assert!(!policy.should_save(Some("Hello world"), "Hello world").unwrap());
    }

    #[test]
    fn significant_edit_saved() {
        // "Hello" -> "Hello world": similarity ~0.45, well under 0.95.
        let policy = AutoSavePolicy::default();
        assert!(policy.should_save(Some("Hello"), "Hello world").unwrap());
    }

    #[test]
    fn trailing_space_still_saved_under_default_threshold() {
        // similarity 5/6 ~ 0.83 < 0.95, so even a trailing space persists.
        let policy = AutoSavePolicy::default();
        assert!(policy.should_save(Some("Hello"), "Hello ").unwrap());
    }

    #[test]
    fn near_identical_long_text_not_saved() {
        let last = "x".repeat(1000);
        let candidate = format!("{}y", &last[..999]);
        let policy = AutoSavePolicy::default();
        assert!(!policy.should_save(Some(&last), &candidate).unwrap());
    }

    #[test]
    fn threshold_is_configurable() {
        let policy = AutoSavePolicy::new(0.5);
        // similarity 5/6 ~ 0.83 >= 0.5: not significant for a stricter policy.
        assert!(!policy.should_save(Some("Hello"), "Hello ").unwrap());
        let policy = AutoSavePolicy::new(0.99);
        assert!(policy.should_save(Some("Hello"), "Hello ").unwrap());
    }
}
