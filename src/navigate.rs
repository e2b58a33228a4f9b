//! Read-only cursor movement over the file/hunk/line hierarchy.
//!
//! The navigator flattens a parsed model into document order and moves a
//! cursor across it. It never touches selection state; a rendering layer
//! maps the returned entries to screen locations however it likes.
//!
//! Every movement returns `Some(entry)` for the line landed on, or `None`
//! when nothing exists in the requested direction; in that case the
//! cursor stays where it was. `None` is the "no more lines" signal a UI
//! surfaces to the user, not an error.

use crate::diff::Diff;
use crate::diff::line::LineEntry;

/// Position of one line in the flattened model: indices into
/// `files[f].hunks[h].lines[l]`.
type Pos = (usize, usize, usize);

/// Cursor over one parsed diff.
pub struct Navigator<'d> {
    diff: &'d Diff,
    order: Vec<Pos>,
    cursor: Option<usize>,
}

impl<'d> Navigator<'d> {
    /// Start on the first line of the model, or nowhere if it has none.
    pub fn new(diff: &'d Diff) -> Self {
        let mut order = Vec::new();
        for (f, file) in diff.files.iter().enumerate() {
            for (h, hunk) in file.hunks.iter().enumerate() {
                for l in 0..hunk.lines.len() {
                    order.push((f, h, l));
                }
            }
        }
        let cursor = if order.is_empty() { None } else { Some(0) };
        Self {
            diff,
            order,
            cursor,
        }
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&'d LineEntry> {
        self.cursor.map(|i| self.entry(i))
    }

    /// Adjacent line in document order, across hunk and file boundaries.
    pub fn next_line(&mut self) -> Option<&'d LineEntry> {
        let next = self.cursor?.checked_add(1).filter(|&i| i < self.order.len())?;
        self.land(next)
    }

    pub fn previous_line(&mut self) -> Option<&'d LineEntry> {
        let prev = self.cursor?.checked_sub(1)?;
        self.land(prev)
    }

    /// Next change line, skipping context; supports the "accept this line
    /// and advance" workflow.
    pub fn next_selectable_line(&mut self) -> Option<&'d LineEntry> {
        let start = self.cursor?;
        let found = (start + 1..self.order.len()).find(|&i| self.entry(i).kind.selectable())?;
        self.land(found)
    }

    pub fn previous_selectable_line(&mut self) -> Option<&'d LineEntry> {
        let start = self.cursor?;
        let found = (0..start).rev().find(|&i| self.entry(i).kind.selectable())?;
        self.land(found)
    }

    /// First line of the next hunk; crosses into the next file when the
    /// current hunk is the last of its file.
    pub fn next_hunk(&mut self) -> Option<&'d LineEntry> {
        let start = self.cursor?;
        let (f, h, _) = self.order[start];
        let found = (start + 1..self.order.len()).find(|&i| {
            let (nf, nh, _) = self.order[i];
            (nf, nh) != (f, h)
        })?;
        self.land(found)
    }

    /// First line of the previous hunk.
    pub fn previous_hunk(&mut self) -> Option<&'d LineEntry> {
        let start = self.cursor?;
        let (f, h, _) = self.order[start];
        let last_of_prev = (0..start).rev().find(|&i| {
            let (pf, ph, _) = self.order[i];
            (pf, ph) != (f, h)
        })?;
        self.land(self.start_of_group(last_of_prev, |a, b| (a.0, a.1) == (b.0, b.1)))
    }

    /// First line of the next file.
    pub fn next_file(&mut self) -> Option<&'d LineEntry> {
        let start = self.cursor?;
        let (f, _, _) = self.order[start];
        let found = (start + 1..self.order.len()).find(|&i| self.order[i].0 != f)?;
        self.land(found)
    }

    /// First line of the previous file.
    pub fn previous_file(&mut self) -> Option<&'d LineEntry> {
        let start = self.cursor?;
        let (f, _, _) = self.order[start];
        let last_of_prev = (0..start).rev().find(|&i| self.order[i].0 != f)?;
        self.land(self.start_of_group(last_of_prev, |a, b| a.0 == b.0))
    }

    fn entry(&self, i: usize) -> &'d LineEntry {
        let (f, h, l) = self.order[i];
        &self.diff.files[f].hunks[h].lines[l]
    }

    fn land(&mut self, i: usize) -> Option<&'d LineEntry> {
        self.cursor = Some(i);
        Some(self.entry(i))
    }

    /// Walk backwards from `i` to the first position in the same group.
    fn start_of_group(&self, i: usize, same: impl Fn(Pos, Pos) -> bool) -> usize {
        let target = self.order[i];
        (0..i)
            .rev()
            .take_while(|&j| same(self.order[j], target))
            .last()
            .unwrap_or(i)
    }
}
