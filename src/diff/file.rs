use std::fmt;

use super::hunk::HunkDiff;
use super::line::LineEntry;

/// All hunks for one file of a diff.
///
/// `path` is the new-side path from the `diff --git a/<old> b/<new>` header
/// and is unique within one parsed diff. A file with no hunks is legal (a
/// pure rename or mode change); it simply has no selectable lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub hunks: Vec<HunkDiff>,
}

impl FileDiff {
    /// Look up a hunk by its 1-based index.
    pub fn hunk(&self, index: usize) -> Option<&HunkDiff> {
        index.checked_sub(1).and_then(|i| self.hunks.get(i))
    }

    /// All lines of the file in document order.
    pub fn lines(&self) -> impl Iterator<Item = &LineEntry> {
        self.hunks.iter().flat_map(|h| h.lines.iter())
    }
}

impl fmt::Display for FileDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "diff --git a/{} b/{}", self.path, self.path)?;
        writeln!(f, "--- a/{}", self.path)?;
        writeln!(f, "+++ b/{}", self.path)?;
        for hunk in &self.hunks {
            write!(f, "{hunk}")?;
        }
        Ok(())
    }
}
