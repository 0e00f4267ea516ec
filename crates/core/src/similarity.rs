//! Similarity scoring over an edit script.

use crate::diff::{DiffOp, DiffSpan};

/// Fraction of the target text that is unchanged relative to the reference.
///
/// `target_chars` is the character count of the target (new) text. Since
/// every equal span is a substring of the target, the result is in `[0, 1]`
/// when called with a script produced against that target. An empty target
/// is trivially unchanged and scores `1.0`.
pub fn similarity(spans: &[DiffSpan], target_chars: usize) -> f64 {
    if target_chars == 0 {
        return 1.0;
    }
    let equal_chars: usize = spans
        .iter()
        .filter(|s| s.op == DiffOp::Equal)
        .map(|s| s.text.chars().count())
        .sum();
    equal_chars as f64 / target_chars as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_diff;

    fn score(old: &str, new: &str) -> f64 {
        let spans = compute_diff(old, new).unwrap();
        similarity(&spans, new.chars().count())
    }

    #[test]
    fn identical_texts_score_one() {
        assert_eq!(score("Hello world", "Hello world"), 1.0);
    }

    #[test]
    fn empty_target_scores_one() {
        assert_eq!(similarity(&[], 0), 1.0);
        assert_eq!(score("anything", ""), 1.0);
    }

    #[test]
    fn disjoint_texts_score_zero() {
        assert_eq!(score("aaaa", "bbbb"), 0.0);
    }

    #[test]
    fn appended_word_scores_by_shared_prefix() {
        // "Hello" -> "Hello world": 5 of 11 chars unchanged.
        let s = score("Hello", "Hello world");
        assert!((s - 5.0 / 11.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn trailing_space_scores_by_shared_prefix() {
        // "Hello" -> "Hello ": 5 of 6 chars unchanged.
        let s = score("Hello", "Hello ");
        assert!((s - 5.0 / 6.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn score_counts_chars_not_bytes() {
        // Multi-byte chars must count once each.
        let s = score("ééé", "ééx");
        assert!((s - 2.0 / 3.0).abs() < 1e-9, "got {s}");
    }
}
