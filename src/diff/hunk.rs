use std::fmt;

use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::{char, u32 as dec_u32},
    combinator::opt,
    sequence::preceded,
};

use super::ParseError;
use super::line::{LineEntry, LineKind};

/// The four integers of a `@@ -a,b +c,d @@` hunk header, plus the trailing
/// section text git appends after the closing `@@`.
///
/// A count that is omitted in the text (`@@ -136,0 +137 @@`) means 1, per
/// the unified-diff convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    /// Function-context text after the closing `@@`, empty if absent
    pub section: String,
}

/// Matches `@@ -a[,b] +c[,d] @@` and returns the unconsumed remainder.
fn ranges(input: &str) -> IResult<&str, (u32, Option<u32>, u32, Option<u32>)> {
    let (rest, (_, old_start, old_count, _, new_start, new_count, _)) = (
        tag("@@ -"),
        dec_u32,
        opt(preceded(char(','), dec_u32)),
        tag(" +"),
        dec_u32,
        opt(preceded(char(','), dec_u32)),
        tag(" @@"),
    )
        .parse(input)?;
    Ok((rest, (old_start, old_count, new_start, new_count)))
}

impl HunkHeader {
    /// Parse a full hunk-header line.
    ///
    /// # Examples
    /// ```
    /// use patchpick::HunkHeader;
    ///
    /// let h = HunkHeader::parse("@@ -10,2 +10,3 @@ fn main()").unwrap();
    /// assert_eq!((h.old_start, h.old_count, h.new_start, h.new_count), (10, 2, 10, 3));
    /// assert_eq!(h.section, "fn main()");
    ///
    /// let h = HunkHeader::parse("@@ -136,0 +137 @@").unwrap();
    /// assert_eq!(h.new_count, 1);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedHunkHeader`] when the line does not
    /// match the `@@ -a[,b] +c[,d] @@` shape. The diff parser treats this as
    /// fatal for the whole parse: the splitter's header arithmetic depends
    /// on these integers.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let (rest, (old_start, old_count, new_start, new_count)) =
            ranges(line).map_err(|_| ParseError::MalformedHunkHeader {
                header: line.to_string(),
            })?;

        let section = rest.strip_prefix(' ').unwrap_or(rest).trim_end();

        Ok(HunkHeader {
            old_start,
            old_count: old_count.unwrap_or(1),
            new_start,
            new_count: new_count.unwrap_or(1),
            section: section.to_string(),
        })
    }
}

impl fmt::Display for HunkHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Omit a count of exactly 1, matching what git itself emits.
        let side = |start: u32, count: u32| match count {
            1 => format!("{start}"),
            n => format!("{start},{n}"),
        };

        write!(
            f,
            "@@ -{} +{} @@",
            side(self.old_start, self.old_count),
            side(self.new_start, self.new_count)
        )?;
        if !self.section.is_empty() {
            write!(f, " {}", self.section)?;
        }
        Ok(())
    }
}

/// One hunk of a file diff: its header and ordered lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkDiff {
    /// 1-based position of this hunk within its file
    pub index: usize,
    pub header: HunkHeader,
    pub lines: Vec<LineEntry>,
}

impl HunkDiff {
    /// Lines that can carry a selection (additions and deletions).
    pub fn changes(&self) -> impl Iterator<Item = &LineEntry> {
        self.lines.iter().filter(|l| l.kind.selectable())
    }

    pub fn context_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.kind == LineKind::Context)
            .count()
    }

    /// The hunk body as it appeared in the diff, markers restored.
    pub fn body(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push(line.kind.marker());
            out.push_str(&line.content);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for HunkDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::diff::line::LineId;
    use similar_asserts::assert_eq;

    #[test]
    fn parse_full_header() {
        let h = HunkHeader::parse("@@ -1,2 +1,3 @@").unwrap();
        assert_eq!(h.old_start, 1);
        assert_eq!(h.old_count, 2);
        assert_eq!(h.new_start, 1);
        assert_eq!(h.new_count, 3);
        assert_eq!(h.section, "");
    }

    #[test]
    fn parse_omitted_counts_default_to_one() {
        let h = HunkHeader::parse("@@ -15 +14,0 @@").unwrap();
        assert_eq!(h.old_count, 1);
        assert_eq!(h.new_start, 14);
        assert_eq!(h.new_count, 0);
    }

    #[test]
    fn parse_keeps_section_text() {
        let h = HunkHeader::parse("@@ -10,2 +10,3 @@ impl Display for Hunk").unwrap();
        assert_eq!(h.section, "impl Display for Hunk");
    }

    #[test]
    fn parse_insertion_at_file_start() {
        let h = HunkHeader::parse("@@ -0,0 +1,2 @@").unwrap();
        assert_eq!(h.old_start, 0);
        assert_eq!(h.old_count, 0);
        assert_eq!(h.new_start, 1);
        assert_eq!(h.new_count, 2);
    }

    #[test]
    fn parse_rejects_missing_new_side() {
        let result = HunkHeader::parse("@@ -1,2 @@");
        assert!(matches!(
            result,
            Err(ParseError::MalformedHunkHeader { .. })
        ));
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let result = HunkHeader::parse("@@ -a,b +c,d @@");
        assert!(matches!(
            result,
            Err(ParseError::MalformedHunkHeader { .. })
        ));
    }

    #[test]
    fn parse_rejects_unterminated_header() {
        let result = HunkHeader::parse("@@ -1,2 +1,3");
        assert!(matches!(
            result,
            Err(ParseError::MalformedHunkHeader { .. })
        ));
    }

    #[test]
    fn display_omits_count_of_one() {
        let h = HunkHeader {
            old_start: 15,
            old_count: 1,
            new_start: 14,
            new_count: 0,
            section: String::new(),
        };
        assert_eq!(h.to_string(), "@@ -15 +14,0 @@");
    }

    #[test]
    fn display_appends_section() {
        let h = HunkHeader {
            old_start: 10,
            old_count: 2,
            new_start: 10,
            new_count: 3,
            section: "fn main()".to_string(),
        };
        assert_eq!(h.to_string(), "@@ -10,2 +10,3 @@ fn main()");
    }

    #[test]
    fn header_roundtrips_through_display() {
        for text in [
            "@@ -1,2 +1,3 @@",
            "@@ -15 +14,0 @@",
            "@@ -0,0 +1,2 @@",
            "@@ -10,2 +10,3 @@ fn main()",
        ] {
            let h = HunkHeader::parse(text).unwrap();
            assert_eq!(h.to_string(), text);
        }
    }

    fn entry(hunk: usize, line: usize, kind: LineKind, content: &str) -> LineEntry {
        LineEntry {
            id: LineId::new("f.txt", hunk, line),
            kind,
            content: content.to_string(),
        }
    }

    #[test]
    fn body_restores_markers_in_order() {
        let hunk = HunkDiff {
            index: 1,
            header: HunkHeader::parse("@@ -1,2 +1,3 @@").unwrap(),
            lines: vec![
                entry(1, 1, LineKind::Context, "context"),
                entry(1, 2, LineKind::Deletion, "old"),
                entry(1, 3, LineKind::Addition, "new1"),
                entry(1, 4, LineKind::Addition, "new2"),
            ],
        };
        assert_eq!(hunk.body(), " context\n-old\n+new1\n+new2\n");
        assert_eq!(
            hunk.to_string(),
            "@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n"
        );
    }

    #[test]
    fn changes_skip_context() {
        let hunk = HunkDiff {
            index: 1,
            header: HunkHeader::parse("@@ -1,2 +1,2 @@").unwrap(),
            lines: vec![
                entry(1, 1, LineKind::Context, "ctx"),
                entry(1, 2, LineKind::Deletion, "old"),
                entry(1, 3, LineKind::Addition, "new"),
            ],
        };
        let markers: Vec<char> = hunk.changes().map(|l| l.kind.marker()).collect();
        assert_eq!(markers, vec!['-', '+']);
        assert_eq!(hunk.context_count(), 1);
    }
}
