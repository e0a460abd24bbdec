//! Line-level text diff between two snapshot contents.
//!
//! The engine is a pure function: [`diff`] takes two texts and returns the
//! ordered list of [`DiffOp`]s that turns the first into the second.
//! Granularity is always one line (including its terminator), which keeps
//! noise low for line-oriented configuration dumps.
//!
//! Invariants of every [`DiffResult`]:
//! - concatenating the text of all non-delete ops yields the new content
//! - concatenating the text of all non-insert ops yields the old content
//! - no op has empty text and no two adjacent ops share a tag

use std::fmt::Write as _;

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use crate::logging::trace;

/// Kind of a diff operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffTag {
    Equal,
    Insert,
    Delete,
}

impl DiffTag {
    /// Prefix used by the unified text rendering.
    pub fn sign(&self) -> char {
        match self {
            DiffTag::Equal => ' ',
            DiffTag::Insert => '+',
            DiffTag::Delete => '-',
        }
    }
}

/// One contiguous span of the diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffOp {
    pub tag: DiffTag,
    pub text: String,
}

impl DiffOp {
    pub fn new(tag: DiffTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

/// Ordered sequence of diff operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiffResult {
    ops: Vec<DiffOp>,
}

impl DiffResult {
    pub fn ops(&self) -> &[DiffOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DiffOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True when both inputs were identical.
    pub fn is_unchanged(&self) -> bool {
        self.ops.iter().all(|op| op.tag == DiffTag::Equal)
    }

    /// Rebuild the old content (every op except inserts).
    pub fn old_text(&self) -> String {
        self.collect_except(DiffTag::Insert)
    }

    /// Rebuild the new content (every op except deletes).
    pub fn new_text(&self) -> String {
        self.collect_except(DiffTag::Delete)
    }

    /// Number of inserted and deleted lines.
    pub fn line_counts(&self) -> (usize, usize) {
        let count = |tag| {
            self.ops
                .iter()
                .filter(|op| op.tag == tag)
                .map(|op| op.text.split_inclusive('\n').count())
                .sum()
        };
        (count(DiffTag::Insert), count(DiffTag::Delete))
    }

    /// Render every line prefixed by `+`, `-` or a space.
    ///
    /// Lines lacking a terminator (the last line of a file without a final
    /// newline) get one so the output stays line-oriented.
    pub fn unified(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            for line in op.text.split_inclusive('\n') {
                let _ = write!(out, "{}{}", op.tag.sign(), line);
                if !line.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
        out
    }

    fn collect_except(&self, skip: DiffTag) -> String {
        self.ops
            .iter()
            .filter(|op| op.tag != skip)
            .map(|op| op.text.as_str())
            .collect()
    }

    /// Append text, merging with the previous op when tags match.
    fn push(&mut self, tag: DiffTag, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.ops.last_mut() {
            Some(last) if last.tag == tag => last.text.push_str(text),
            _ => self.ops.push(DiffOp::new(tag, text)),
        }
    }
}

impl IntoIterator for DiffResult {
    type Item = DiffOp;
    type IntoIter = std::vec::IntoIter<DiffOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Compute the line-level difference from `old` to `new`.
///
/// # Example
///
/// ```
/// use conftrail::diff::{diff, DiffTag};
///
/// let result = diff("line1\nline2\n", "line1\nline3\n");
/// let tags: Vec<_> = result.ops().iter().map(|op| op.tag).collect();
/// assert_eq!(tags, [DiffTag::Equal, DiffTag::Delete, DiffTag::Insert]);
/// assert_eq!(result.new_text(), "line1\nline3\n");
/// ```
pub fn diff(old: &str, new: &str) -> DiffResult {
    let text_diff = TextDiff::from_lines(old, new);

    let mut result = DiffResult::default();
    // Within a run of changes, deletions are emitted before insertions.
    let mut deleted = String::new();
    let mut inserted = String::new();

    for change in text_diff.iter_all_changes() {
        let value = change.value();
        match change.tag() {
            ChangeTag::Delete => deleted.push_str(value),
            ChangeTag::Insert => inserted.push_str(value),
            ChangeTag::Equal => {
                result.push(DiffTag::Delete, &deleted);
                result.push(DiffTag::Insert, &inserted);
                deleted.clear();
                inserted.clear();
                result.push(DiffTag::Equal, value);
            }
        }
    }
    result.push(DiffTag::Delete, &deleted);
    result.push(DiffTag::Insert, &inserted);

    trace!(
        old_len = old.len(),
        new_len = new.len(),
        ops = result.ops.len(),
        "computed diff"
    );
    result
}
