//! Splitting a diff into complementary selected/remainder patches.
//!
//! Given a parsed model and a selection snapshot, [`split`] partitions each
//! hunk's change lines: selected additions and deletions go to the selected
//! patch, the rest to the remainder, context lines to every hunk that is
//! emitted at all. Hunk headers are recomputed so each output stays an
//! internally coherent unified diff against the original old file:
//! old-start is carried from the source header, counts come from the
//! retained lines, and new-start absorbs the cumulative line delta of
//! earlier hunks in the same file.

use error_set::error_set;

use crate::diff::Diff;
use crate::diff::file::FileDiff;
use crate::diff::hunk::{HunkDiff, HunkHeader};
use crate::diff::line::{LineEntry, LineId, LineKind};
use crate::select::SelectionStore;

error_set! {
    /// Errors from splitting a diff against a selection snapshot
    SplitError := {
        /// The selection references a line outside the supplied model:
        /// the store was built against a different parse.
        #[display("Stale selection: {id} is not part of the diff being split")]
        StaleSelection { id: LineId },
    }
}

/// The two complementary halves of a split.
///
/// Each half is a full model; render with `to_string()` for patch text.
/// A half with no retained changes is an empty `Diff` and renders as "".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPair {
    /// Exactly the selected changes
    pub selected: Diff,
    /// Everything that was not selected
    pub remainder: Diff,
}

/// Which half of the pair a hunk is being rebuilt for.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Half {
    Selected,
    Remainder,
}

impl Half {
    /// Does this half retain the given change line?
    fn retains(self, selected: bool) -> bool {
        match self {
            Half::Selected => selected,
            Half::Remainder => !selected,
        }
    }
}

/// Split one parsed diff into its selected and remainder patches.
///
/// Pure and repeatable: neither input is mutated.
///
/// # Examples
/// ```
/// use patchpick::{Diff, SelectionStore, split};
///
/// let diff = Diff::parse("diff --git a/f b/f\n@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n").unwrap();
/// let mut selection = SelectionStore::new(&diff);
/// selection.select_hunk("f", 1);
///
/// let pair = split(&diff, &selection).unwrap();
/// assert!(pair.selected.to_string().contains("@@ -1,2 +1,3 @@"));
/// assert!(pair.remainder.is_empty());
/// ```
///
/// # Errors
///
/// [`SplitError::StaleSelection`] if the store holds an id the model does
/// not contain.
pub fn split(diff: &Diff, selection: &SelectionStore) -> Result<PatchPair, SplitError> {
    for id in selection.selected_ids() {
        if !diff.contains(id) {
            return Err(SplitError::StaleSelection { id: id.clone() });
        }
    }

    Ok(PatchPair {
        selected: rebuild(diff, selection, Half::Selected),
        remainder: rebuild(diff, selection, Half::Remainder),
    })
}

/// Rebuild one half of the pair as a standalone model.
fn rebuild(diff: &Diff, selection: &SelectionStore, half: Half) -> Diff {
    let files = diff
        .files
        .iter()
        .filter_map(|file| rebuild_file(file, selection, half))
        .collect();
    Diff { files }
}

fn rebuild_file(file: &FileDiff, selection: &SelectionStore, half: Half) -> Option<FileDiff> {
    let mut hunks: Vec<HunkDiff> = Vec::new();
    // Net line-count shift seen by this half's new-side positions, from
    // earlier hunks whose retained delta differs from the original's.
    let mut delta: i64 = 0;

    for hunk in &file.hunks {
        let mut kept: Vec<&LineEntry> = Vec::new();
        let mut context = 0u32;
        let mut additions = 0u32;
        let mut deletions = 0u32;
        let mut orig_additions = 0i64;
        let mut orig_deletions = 0i64;

        for line in &hunk.lines {
            match line.kind {
                LineKind::Context => {
                    context += 1;
                    kept.push(line);
                }
                LineKind::Addition => {
                    orig_additions += 1;
                    if half.retains(selection.is_selected(&line.id)) {
                        additions += 1;
                        kept.push(line);
                    }
                }
                LineKind::Deletion => {
                    orig_deletions += 1;
                    if half.retains(selection.is_selected(&line.id)) {
                        deletions += 1;
                        kept.push(line);
                    }
                }
            }
        }

        // A hunk that retains only context represents no change: omit it.
        if additions + deletions > 0 {
            let index = hunks.len() + 1;
            let header = HunkHeader {
                old_start: hunk.header.old_start,
                old_count: context + deletions,
                new_start: shifted(hunk.header.new_start, delta),
                new_count: context + additions,
                section: hunk.header.section.clone(),
            };
            let lines = kept
                .into_iter()
                .enumerate()
                .map(|(li, line)| LineEntry {
                    id: LineId::new(file.path.clone(), index, li + 1),
                    kind: line.kind,
                    content: line.content.clone(),
                })
                .collect();
            hunks.push(HunkDiff {
                index,
                header,
                lines,
            });
        }

        delta += (i64::from(additions) - i64::from(deletions))
            - (orig_additions - orig_deletions);
    }

    if hunks.is_empty() {
        None
    } else {
        Some(FileDiff {
            path: file.path.clone(),
            hunks,
        })
    }
}

/// Apply a signed shift to a new-start, saturating at zero; a coherent
/// input diff never actually drives this negative.
fn shifted(start: u32, delta: i64) -> u32 {
    let shifted = i64::from(start) + delta;
    u32::try_from(shifted).unwrap_or(0)
}
