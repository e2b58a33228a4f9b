//! Per-line selection state, kept outside the parsed model.
//!
//! The model from [`Diff::parse`] is immutable; what the user has selected
//! lives here, keyed by [`LineId`]. The store is an explicitly owned value:
//! reparsing does not silently destroy it, because [`SelectionStore::carry_from`]
//! rebuilds against a fresh model while keeping every selection whose
//! identity still resolves.

use std::collections::{HashMap, HashSet};

use error_set::error_set;

use crate::diff::Diff;
use crate::diff::line::{LineId, LineKind};

error_set! {
    /// Errors from selection operations
    SelectError := {
        /// The id does not name a line of the model this store was built
        /// from. Almost always a stale reference held across a reparse.
        #[display("Unknown line {id}: not part of the current diff")]
        UnknownLine { id: LineId },
    }
}

/// Mutable selection flags over one parsed diff.
///
/// Context lines are indexed but permanently unselectable: toggling one is
/// a guaranteed no-op, never an error. Operations on ids outside the model
/// fail with [`SelectError::UnknownLine`].
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    kinds: HashMap<LineId, LineKind>,
    selected: HashSet<LineId>,
}

impl SelectionStore {
    /// Index every line of the model, nothing selected.
    pub fn new(diff: &Diff) -> Self {
        let kinds = diff
            .lines()
            .map(|entry| (entry.id.clone(), entry.kind))
            .collect();
        Self {
            kinds,
            selected: HashSet::new(),
        }
    }

    /// Rebuild against a freshly parsed model, preserving selections whose
    /// `(path, hunk, line)` identity still names a selectable line.
    ///
    /// This is the opt-in merge for reparse: plain [`SelectionStore::new`]
    /// is the discard path.
    pub fn carry_from(diff: &Diff, previous: &SelectionStore) -> Self {
        let mut store = Self::new(diff);
        for id in &previous.selected {
            if store.kinds.get(id).is_some_and(|k| k.selectable()) {
                store.selected.insert(id.clone());
            }
        }
        store
    }

    /// Flip one line's selection. Returns the new state.
    ///
    /// # Errors
    ///
    /// [`SelectError::UnknownLine`] if the id is not part of the model.
    pub fn toggle(&mut self, id: &LineId) -> Result<bool, SelectError> {
        let kind = self.lookup(id)?;
        if !kind.selectable() {
            return Ok(false);
        }
        if self.selected.remove(id) {
            Ok(false)
        } else {
            self.selected.insert(id.clone());
            Ok(true)
        }
    }

    /// Set one line's selection explicitly.
    ///
    /// # Errors
    ///
    /// [`SelectError::UnknownLine`] if the id is not part of the model.
    pub fn set(&mut self, id: &LineId, selected: bool) -> Result<(), SelectError> {
        let kind = self.lookup(id)?;
        if kind.selectable() {
            if selected {
                self.selected.insert(id.clone());
            } else {
                self.selected.remove(id);
            }
        }
        Ok(())
    }

    /// False for context lines and for ids outside the model.
    pub fn is_selected(&self, id: &LineId) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = &LineId> {
        self.selected.iter()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Select every change line of one hunk. No-op for keys that match
    /// nothing (a hunkless rename is a legal target).
    pub fn select_hunk(&mut self, path: &str, hunk: usize) {
        self.set_matching(|id| id.path == path && id.hunk == hunk, true);
    }

    pub fn unselect_hunk(&mut self, path: &str, hunk: usize) {
        self.set_matching(|id| id.path == path && id.hunk == hunk, false);
    }

    /// Select every change line of one file, across all its hunks.
    pub fn select_file(&mut self, path: &str) {
        self.set_matching(|id| id.path == path, true);
    }

    pub fn unselect_file(&mut self, path: &str) {
        self.set_matching(|id| id.path == path, false);
    }

    /// Clear every selection, globally.
    pub fn reset_all(&mut self) {
        self.selected.clear();
    }

    fn lookup(&self, id: &LineId) -> Result<LineKind, SelectError> {
        self.kinds
            .get(id)
            .copied()
            .ok_or_else(|| SelectError::UnknownLine { id: id.clone() })
    }

    fn set_matching(&mut self, predicate: impl Fn(&LineId) -> bool, selected: bool) {
        let matches: Vec<LineId> = self
            .kinds
            .iter()
            .filter(|(id, kind)| kind.selectable() && predicate(id))
            .map(|(id, _)| id.clone())
            .collect();
        for id in matches {
            if selected {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const TWO_FILES: &str = "\
diff --git a/a.txt b/a.txt
@@ -1,2 +1,3 @@
 ctx
-old
+new1
+new2
@@ -10,1 +11,1 @@
-p
+q
diff --git a/b.txt b/b.txt
@@ -5,0 +6 @@
+z
";

    fn fixture() -> (Diff, SelectionStore) {
        let diff = Diff::parse(TWO_FILES).unwrap();
        let store = SelectionStore::new(&diff);
        (diff, store)
    }

    fn id(path: &str, hunk: usize, line: usize) -> LineId {
        LineId::new(path, hunk, line)
    }

    #[test]
    fn toggle_flips_a_change_line() {
        let (_, mut store) = fixture();
        let target = id("a.txt", 1, 2);
        assert!(store.toggle(&target).unwrap());
        assert!(store.is_selected(&target));
        assert!(!store.toggle(&target).unwrap());
        assert!(!store.is_selected(&target));
    }

    #[test]
    fn context_lines_are_permanently_unselected() {
        let (_, mut store) = fixture();
        let ctx = id("a.txt", 1, 1);
        assert!(!store.toggle(&ctx).unwrap());
        assert!(!store.is_selected(&ctx));
        store.set(&ctx, true).unwrap();
        assert!(!store.is_selected(&ctx));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let (_, mut store) = fixture();
        let stale = id("a.txt", 9, 1);
        assert!(matches!(
            store.toggle(&stale),
            Err(SelectError::UnknownLine { .. })
        ));
        assert!(matches!(
            store.set(&stale, true),
            Err(SelectError::UnknownLine { .. })
        ));
        assert!(!store.is_selected(&stale));
    }

    #[test]
    fn select_hunk_takes_changes_only() {
        let (_, mut store) = fixture();
        store.select_hunk("a.txt", 1);
        assert!(!store.is_selected(&id("a.txt", 1, 1))); // context
        assert!(store.is_selected(&id("a.txt", 1, 2)));
        assert!(store.is_selected(&id("a.txt", 1, 3)));
        assert!(store.is_selected(&id("a.txt", 1, 4)));
        // other hunks and files untouched
        assert!(!store.is_selected(&id("a.txt", 2, 1)));
        assert!(!store.is_selected(&id("b.txt", 1, 1)));
    }

    #[test]
    fn select_file_spans_every_hunk() {
        let (_, mut store) = fixture();
        store.select_file("a.txt");
        assert_eq!(store.selected_count(), 5);
        assert!(!store.is_selected(&id("b.txt", 1, 1)));
    }

    #[test]
    fn bulk_ops_are_idempotent() {
        let (_, mut store) = fixture();
        store.select_hunk("a.txt", 1);
        let once: std::collections::BTreeSet<_> = store.selected_ids().cloned().collect();
        store.select_hunk("a.txt", 1);
        let twice: std::collections::BTreeSet<_> = store.selected_ids().cloned().collect();
        assert_eq!(once, twice);

        store.reset_all();
        assert_eq!(store.selected_count(), 0);
        store.reset_all();
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn bulk_ops_on_missing_keys_are_noops() {
        let (_, mut store) = fixture();
        store.select_hunk("a.txt", 7);
        store.select_file("missing.txt");
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn unselect_hunk_leaves_the_rest() {
        let (_, mut store) = fixture();
        store.select_file("a.txt");
        store.unselect_hunk("a.txt", 1);
        assert!(!store.is_selected(&id("a.txt", 1, 2)));
        assert!(store.is_selected(&id("a.txt", 2, 1)));
    }

    #[test]
    fn carry_from_keeps_matching_identities() {
        let (_, mut store) = fixture();
        store.select_hunk("a.txt", 1);
        store.select_file("b.txt");

        // Reparse where a.txt hunk 1 shrank: line 4 is gone, line 2 is now
        // a context line, b.txt vanished entirely.
        let reparsed = Diff::parse(
            "diff --git a/a.txt b/a.txt\n@@ -1,2 +1,2 @@\n ctx\n old\n+new1\n",
        )
        .unwrap();
        let merged = SelectionStore::carry_from(&reparsed, &store);

        assert!(merged.is_selected(&id("a.txt", 1, 3)));
        assert!(!merged.is_selected(&id("a.txt", 1, 2))); // context now
        assert!(!merged.is_selected(&id("a.txt", 1, 4))); // gone
        assert!(!merged.is_selected(&id("b.txt", 1, 1))); // file gone
        assert_eq!(merged.selected_count(), 1);
    }

    #[test]
    fn selected_ids_round_trip_through_the_model() {
        let (diff, mut store) = fixture();
        store.select_file("a.txt");
        for sel in store.selected_ids() {
            assert!(diff.contains(sel));
        }
    }
}
