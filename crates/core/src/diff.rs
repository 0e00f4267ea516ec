//! Character-level text diffing with semantic cleanup and rendering.
//!
//! Produces an edit script between two texts as a list of tagged spans, then
//! post-processes it so trivial fragmentation (a word reported as partially
//! deleted and partially inserted) collapses into edits a human would expect.
//! Two renderings are exposed: HTML markup for the editor's diff viewer and a
//! line-oriented text form for logs and machine consumers.
//!
//! The underlying edit script comes from the `similar` crate (Myers/LCS
//! family). Nothing downstream depends on the algorithm itself; the only
//! contract is the round-trip property: concatenating equal+delete spans
//! reconstructs the old text, equal+insert spans the new text.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use crate::error::CoreError;

/// Maximum size of either diff input, in bytes.
///
/// Character-level diffing is quadratic in the worst case, so inputs are
/// bounded rather than allowed to stall a shared worker. This matches
/// [`crate::versioning::MAX_CONTENT_LENGTH`], so any stored version content
/// is always diffable.
pub const MAX_DIFF_INPUT_BYTES: usize = 1_048_576;

/// Equal spans longer than this are truncated in the text rendering.
pub const EQUAL_CONTEXT_MAX_CHARS: usize = 60;

/// Number of leading and trailing characters kept when truncating.
const EQUAL_CONTEXT_EDGE_CHARS: usize = 30;

// ---------------------------------------------------------------------------
// Edit script types
// ---------------------------------------------------------------------------

/// The kind of a span in an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOp {
    /// Present in both texts.
    Equal,
    /// Present only in the new text.
    Insert,
    /// Present only in the old text.
    Delete,
}

/// One contiguous span of an edit script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffSpan {
    pub op: DiffOp,
    pub text: String,
}

impl DiffSpan {
    fn new(op: DiffOp, text: impl Into<String>) -> Self {
        Self {
            op,
            text: text.into(),
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

// ---------------------------------------------------------------------------
// Diff computation
// ---------------------------------------------------------------------------

/// Compute a semantically cleaned edit script between `old` and `new`.
///
/// Returns `Validation` if either input exceeds [`MAX_DIFF_INPUT_BYTES`].
pub fn compute_diff(old: &str, new: &str) -> Result<Vec<DiffSpan>, CoreError> {
    if old.len() > MAX_DIFF_INPUT_BYTES || new.len() > MAX_DIFF_INPUT_BYTES {
        return Err(CoreError::Validation(format!(
            "Diff input exceeds maximum size of {MAX_DIFF_INPUT_BYTES} bytes \
             (got {} and {})",
            old.len(),
            new.len()
        )));
    }

    let diff = TextDiff::from_chars(old, new);
    let mut spans: Vec<DiffSpan> = Vec::new();

    // Coalesce per-character changes into contiguous same-tag spans.
    for change in diff.iter_all_changes() {
        let op = match change.tag() {
            ChangeTag::Equal => DiffOp::Equal,
            ChangeTag::Insert => DiffOp::Insert,
            ChangeTag::Delete => DiffOp::Delete,
        };
        match spans.last_mut() {
            Some(last) if last.op == op => last.text.push_str(change.value()),
            _ => spans.push(DiffSpan::new(op, change.value())),
        }
    }

    cleanup_semantic(&mut spans);
    Ok(spans)
}

/// Fold short equalities that are dwarfed by the edits around them.
///
/// An equal span is eliminated (split into a delete and an insert of the
/// same text, which then merge into their neighbours) when it is no longer
/// than the larger edit on each side. This is the equality-folding rule of
/// diff-match-patch's `diff_cleanupSemantic`, which the diff viewer's
/// output format was built around.
fn cleanup_semantic(spans: &mut Vec<DiffSpan>) {
    let mut changed = false;
    // Indices of equal spans still eligible for folding.
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<String> = None;
    // Edit sizes before and after the last equality.
    let mut ins_before = 0usize;
    let mut del_before = 0usize;
    let mut ins_after = 0usize;
    let mut del_after = 0usize;

    let mut i = 0;
    while i < spans.len() {
        if spans[i].op == DiffOp::Equal {
            equalities.push(i);
            ins_before = ins_after;
            del_before = del_after;
            ins_after = 0;
            del_after = 0;
            last_equality = Some(spans[i].text.clone());
        } else {
            match spans[i].op {
                DiffOp::Insert => ins_after += spans[i].char_len(),
                DiffOp::Delete => del_after += spans[i].char_len(),
                DiffOp::Equal => unreachable!(),
            }
            if let Some(eq) = last_equality.take() {
                let eq_len = eq.chars().count();
                if eq_len <= ins_before.max(del_before) && eq_len <= ins_after.max(del_after) {
                    let idx = equalities.pop().expect("equality index tracked");
                    spans[idx] = DiffSpan::new(DiffOp::Delete, eq.clone());
                    spans.insert(idx + 1, DiffSpan::new(DiffOp::Insert, eq));
                    // The previous equality may now be foldable too; drop it
                    // from the stack and rescan from the one before it.
                    equalities.pop();
                    i = equalities.last().map_or(0, |&n| n + 1);
                    ins_before = 0;
                    del_before = 0;
                    ins_after = 0;
                    del_after = 0;
                    changed = true;
                    continue;
                }
                last_equality = Some(eq);
            }
        }
        i += 1;
    }

    if changed {
        merge_spans(spans);
    }
}

/// Re-normalize a span list: merge adjacent same-op spans, order each edit
/// cluster as delete-then-insert, and drop empty spans.
fn merge_spans(spans: &mut Vec<DiffSpan>) {
    let mut merged: Vec<DiffSpan> = Vec::new();
    let mut pending_delete = String::new();
    let mut pending_insert = String::new();

    let mut flush =
        |merged: &mut Vec<DiffSpan>, pending_delete: &mut String, pending_insert: &mut String| {
            if !pending_delete.is_empty() {
                merged.push(DiffSpan::new(DiffOp::Delete, std::mem::take(pending_delete)));
            }
            if !pending_insert.is_empty() {
                merged.push(DiffSpan::new(DiffOp::Insert, std::mem::take(pending_insert)));
            }
        };

    for span in spans.drain(..) {
        match span.op {
            DiffOp::Delete => pending_delete.push_str(&span.text),
            DiffOp::Insert => pending_insert.push_str(&span.text),
            DiffOp::Equal => {
                flush(&mut merged, &mut pending_delete, &mut pending_insert);
                if span.text.is_empty() {
                    continue;
                }
                match merged.last_mut() {
                    Some(last) if last.op == DiffOp::Equal => last.text.push_str(&span.text),
                    _ => merged.push(span),
                }
            }
        }
    }
    flush(&mut merged, &mut pending_delete, &mut pending_insert);

    *spans = merged;
}

// ---------------------------------------------------------------------------
// Renderings
// ---------------------------------------------------------------------------

/// Render an edit script as HTML for the editor's diff viewer.
///
/// Deletes are wrapped in `<del>` (strikethrough/red), inserts in `<ins>`
/// (highlight/green), equal spans in plain `<span>`. Newlines become a
/// pilcrow plus `<br>` so line structure stays visible inline.
pub fn render_html(spans: &[DiffSpan]) -> String {
    let mut html = String::new();
    for span in spans {
        let text = escape_html(&span.text);
        match span.op {
            DiffOp::Insert => {
                html.push_str("<ins style=\"background:#e6ffe6;\">");
                html.push_str(&text);
                html.push_str("</ins>");
            }
            DiffOp::Delete => {
                html.push_str("<del style=\"background:#ffe6e6;\">");
                html.push_str(&text);
                html.push_str("</del>");
            }
            DiffOp::Equal => {
                html.push_str("<span>");
                html.push_str(&text);
                html.push_str("</span>");
            }
        }
    }
    html
}

/// Render an edit script as line-oriented text.
///
/// Each span becomes one line: `+ ` for inserts, `- ` for deletes, and a
/// two-space prefix for equal context. Equal spans longer than
/// [`EQUAL_CONTEXT_MAX_CHARS`] are truncated to their first and last
/// [`EQUAL_CONTEXT_EDGE_CHARS`] characters joined by an ellipsis, so the
/// output stays bounded regardless of document size.
pub fn render_text(spans: &[DiffSpan]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(spans.len());
    for span in spans {
        match span.op {
            DiffOp::Insert => lines.push(format!("+ {}", span.text)),
            DiffOp::Delete => lines.push(format!("- {}", span.text)),
            DiffOp::Equal => {
                if span.char_len() > EQUAL_CONTEXT_MAX_CHARS {
                    let prefix: String = span.text.chars().take(EQUAL_CONTEXT_EDGE_CHARS).collect();
                    let suffix: String = {
                        let chars: Vec<char> = span.text.chars().collect();
                        chars[chars.len() - EQUAL_CONTEXT_EDGE_CHARS..].iter().collect()
                    };
                    lines.push(format!("  {prefix}...{suffix}"));
                } else {
                    lines.push(format!("  {}", span.text));
                }
            }
        }
    }
    lines.join("\n")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' => escaped.push_str("&para;<br>"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
