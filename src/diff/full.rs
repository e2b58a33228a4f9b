use std::fmt;

use super::ParseError;
use super::file::FileDiff;
use super::hunk::{HunkDiff, HunkHeader};
use super::line::{LineEntry, LineId, LineKind};

/// A complete parsed diff: an ordered sequence of file diffs.
///
/// The model is immutable once built; selection state lives in
/// [`SelectionStore`](crate::SelectionStore), keyed by [`LineId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub files: Vec<FileDiff>,
}

/// Prefixes that are structural noise between a file header and its hunks.
/// `--- ` and `+++ ` must be recognized here, before marker classification,
/// or they would be misread as deletion/addition lines.
const NOISE_PREFIXES: &[&str] = &["index ", "--- ", "+++ ", "new file mode", "deleted file mode"];

impl Diff {
    /// Parse unified-diff text into the file/hunk/line model.
    ///
    /// The scan keeps a current file and current hunk. A `diff --git` line
    /// starts a new file and resets the hunk counter; a `@@` line starts a
    /// new hunk and resets the line counter. Content lines are classified by
    /// their first character only while both are set. Unrecognized lines are
    /// dropped so that malformed or binary-diff noise never aborts a parse;
    /// the single fatal case is a `@@` line whose header does not carry the
    /// expected integers.
    ///
    /// # Examples
    /// ```
    /// use patchpick::Diff;
    ///
    /// let diff = Diff::parse("diff --git a/f b/f\n@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n").unwrap();
    /// assert_eq!(diff.files.len(), 1);
    /// assert_eq!(diff.files[0].hunks[0].lines.len(), 4);
    /// ```
    ///
    /// # Errors
    ///
    /// [`ParseError::MalformedHunkHeader`] aborts the whole parse.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut files: Vec<FileDiff> = Vec::new();

        for raw in input.lines() {
            if let Some(rest) = raw.strip_prefix("diff --git ") {
                // New-side path; `rfind` so paths containing " b/" in the
                // old side cannot truncate it.
                match rest.rfind(" b/") {
                    Some(pos) => files.push(FileDiff {
                        path: rest[pos + 3..].to_string(),
                        hunks: Vec::new(),
                    }),
                    None => continue,
                }
            } else if NOISE_PREFIXES.iter().any(|p| raw.starts_with(p)) {
                continue;
            } else if raw.starts_with("@@") {
                // A hunk header with no preceding file header is stray
                // noise; inside a file it must be well-formed.
                let Some(file) = files.last_mut() else {
                    continue;
                };
                let header = HunkHeader::parse(raw)?;
                file.hunks.push(HunkDiff {
                    index: file.hunks.len() + 1,
                    header,
                    lines: Vec::new(),
                });
            } else {
                let Some(file) = files.last_mut() else {
                    continue;
                };
                let path = file.path.clone();
                let Some(hunk) = file.hunks.last_mut() else {
                    continue;
                };
                let kind = match raw.chars().next() {
                    Some('+') => LineKind::Addition,
                    Some('-') => LineKind::Deletion,
                    Some(' ') => LineKind::Context,
                    _ => continue,
                };
                hunk.lines.push(LineEntry {
                    id: LineId::new(path, hunk.index, hunk.lines.len() + 1),
                    kind,
                    content: raw[1..].to_string(),
                });
            }
        }

        Ok(Diff { files })
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Look up a file by its new-side path.
    pub fn file(&self, path: &str) -> Option<&FileDiff> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Resolve an id back to its entry, if it names a line in this model.
    pub fn entry(&self, id: &LineId) -> Option<&LineEntry> {
        self.file(&id.path)?
            .hunk(id.hunk)?
            .lines
            .get(id.line.checked_sub(1)?)
    }

    pub fn contains(&self, id: &LineId) -> bool {
        self.entry(id).is_some()
    }

    /// Every line of the diff in document order.
    pub fn lines(&self) -> impl Iterator<Item = &LineEntry> {
        self.files.iter().flat_map(|f| f.lines())
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            write!(f, "{file}")?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::diff::testutil::arb_diff;
    use proptest::prelude::*;

    proptest! {
        /// Any structured model survives render -> parse intact.
        #[test]
        fn rendered_diff_reparses_to_same_model(diff in arb_diff()) {
            let rendered = diff.to_string();
            let reparsed = Diff::parse(&rendered);
            prop_assert!(reparsed.is_ok(), "failed to reparse:\n{}", rendered);
            prop_assert_eq!(reparsed.unwrap(), diff);
        }

        /// Ids are unique within any parsed model.
        #[test]
        fn ids_unique(diff in arb_diff()) {
            let mut seen = std::collections::HashSet::new();
            for line in diff.lines() {
                prop_assert!(seen.insert(line.id.clone()));
            }
        }
    }
}
