use std::fmt;

/// Classification of a single hunk line by its diff marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged line shown for positional reference (` ` marker)
    Context,
    /// Line present only in the new version (`+` marker)
    Addition,
    /// Line present only in the old version (`-` marker)
    Deletion,
}

impl LineKind {
    /// The marker character this kind carries in unified-diff text.
    pub fn marker(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
        }
    }

    /// Context lines are the only kind that can never be selected.
    pub fn selectable(self) -> bool {
        !matches!(self, LineKind::Context)
    }
}

/// Identity of one line within a parsed diff.
///
/// `hunk` and `line` are 1-based: `hunk` restarts at 1 for every file,
/// `line` restarts at 1 for every hunk. The triple is unique across one
/// parsed [`Diff`](crate::Diff) and is the only currency the selection
/// store, navigator, and splitter trade in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId {
    /// New-side file path
    pub path: String,
    /// 1-based hunk index within the file
    pub hunk: usize,
    /// 1-based line index within the hunk
    pub line: usize,
}

impl LineId {
    pub fn new(path: impl Into<String>, hunk: usize, line: usize) -> Self {
        Self {
            path: path.into(),
            hunk,
            line,
        }
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.path, self.hunk, self.line)
    }
}

/// One line of a hunk: identity, kind, and content without its marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEntry {
    pub id: LineId,
    pub kind: LineKind,
    /// Raw line text with the leading marker stripped
    pub content: String,
}

impl fmt::Display for LineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.marker(), self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_display_is_path_hunk_line() {
        let id = LineId::new("src/main.rs", 2, 7);
        assert_eq!(id.to_string(), "src/main.rs:2.7");
    }

    #[test]
    fn only_context_is_unselectable() {
        assert!(!LineKind::Context.selectable());
        assert!(LineKind::Addition.selectable());
        assert!(LineKind::Deletion.selectable());
    }

    #[test]
    fn entry_display_restores_marker() {
        let entry = LineEntry {
            id: LineId::new("a.txt", 1, 1),
            kind: LineKind::Deletion,
            content: "old text".to_string(),
        };
        assert_eq!(entry.to_string(), "-old text");
    }
}
