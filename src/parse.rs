//! Parsing for selection-reference syntax.
//!
//! The `stage` and `split` commands take references naming what to select,
//! in the coordinates printed by `show`:
//!
//! - `FILE` - every change line of the file
//! - `FILE:H` - every change line of hunk `H`
//! - `FILE:H.L` - line `L` of hunk `H`
//! - `FILE:H.L..M` - lines `L` through `M` of hunk `H` (inclusive)
//!
//! Everything after the colon is a comma-separated list, so
//! `src/lib.rs:1,3.2..4` selects all of hunk 1 plus lines 2-4 of hunk 3.
//! Hunk and line numbers are the 1-based model indices, not file line
//! numbers.
//!
//! # Examples
//!
//! ```
//! use patchpick::parse::{SelectRef, parse_selection};
//! use std::num::NonZeroUsize;
//!
//! let sel = parse_selection("src/lib.rs:2").unwrap();
//! assert_eq!(sel.file, "src/lib.rs");
//! assert_eq!(sel.refs, vec![SelectRef::Hunk(NonZeroUsize::new(2).unwrap())]);
//!
//! let sel = parse_selection("src/lib.rs").unwrap();
//! assert_eq!(sel.refs, vec![SelectRef::File]);
//!
//! let sel = parse_selection("src/lib.rs:1.2..4").unwrap();
//! assert_eq!(sel.refs, vec![SelectRef::LineRange {
//!     hunk: NonZeroUsize::new(1).unwrap(),
//!     start: NonZeroUsize::new(2).unwrap(),
//!     end: NonZeroUsize::new(4).unwrap(),
//! }]);
//! ```

use error_set::error_set;
use std::num::NonZeroUsize;

error_set! {
    /// Errors from parsing selection-reference syntax
    RefError := {
        /// File name portion before the colon is empty or whitespace
        #[display("Invalid reference '{input}': file name cannot be empty")]
        EmptyFileName { input: String },
        /// A colon was given but no references followed it
        #[display("No selection references provided after ':'")]
        EmptyRefs,
        /// Hunk index could not be parsed as a non-zero number
        #[display("Invalid hunk number '{value}'")]
        InvalidHunkNumber { value: String },
        /// Line index could not be parsed as a non-zero number
        #[display("Invalid line number '{value}'")]
        InvalidLineNumber { value: String },
        /// Range has start greater than end
        #[display("Invalid range {start}..{end}: start must be <= end")]
        InvalidRange { start: usize, end: usize },
    }
}

/// One reference within a file's selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectRef {
    /// The whole file
    File,
    /// One hunk by 1-based index
    Hunk(NonZeroUsize),
    /// One line of one hunk
    Line {
        hunk: NonZeroUsize,
        line: NonZeroUsize,
    },
    /// An inclusive line range within one hunk
    LineRange {
        hunk: NonZeroUsize,
        start: NonZeroUsize,
        end: NonZeroUsize,
    },
}

/// Parsed form of one `FILE[:REFS]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub file: String,
    pub refs: Vec<SelectRef>,
}

/// Parse a `FILE[:REFS]` string into a structured selection.
///
/// # Errors
///
/// Returns [`RefError`] if the file name is empty, the reference list is
/// empty after a colon, or a number/range is malformed.
pub fn parse_selection(input: &str) -> Result<FileSelection, RefError> {
    let (file, refs_part) = match input.split_once(':') {
        Some((file, refs)) => (file, Some(refs)),
        None => (input, None),
    };

    let file = file.trim();
    if file.is_empty() {
        return Err(RefError::EmptyFileName {
            input: input.to_string(),
        });
    }

    let refs = match refs_part {
        None => vec![SelectRef::File],
        Some(part) => parse_refs(part)?,
    };

    Ok(FileSelection {
        file: file.to_string(),
        refs,
    })
}

/// Parse the comma-separated list after the colon.
fn parse_refs(input: &str) -> Result<Vec<SelectRef>, RefError> {
    let refs: Vec<SelectRef> = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_single_ref)
        .collect::<Result<Vec<_>, _>>()?;

    if refs.is_empty() {
        return Err(RefError::EmptyRefs);
    }

    Ok(refs)
}

/// Parse one reference: `H`, `H.L`, or `H.L..M`.
fn parse_single_ref(input: &str) -> Result<SelectRef, RefError> {
    if let Some((head, end_str)) = input.split_once("..") {
        let Some((hunk_str, start_str)) = head.split_once('.') else {
            return Err(RefError::InvalidLineNumber {
                value: input.to_string(),
            });
        };
        let hunk = parse_hunk_number(hunk_str)?;
        let start = parse_line_number(start_str)?;
        let end = parse_line_number(end_str)?;
        if start > end {
            return Err(RefError::InvalidRange {
                start: start.get(),
                end: end.get(),
            });
        }
        Ok(SelectRef::LineRange { hunk, start, end })
    } else if let Some((hunk_str, line_str)) = input.split_once('.') {
        Ok(SelectRef::Line {
            hunk: parse_hunk_number(hunk_str)?,
            line: parse_line_number(line_str)?,
        })
    } else {
        Ok(SelectRef::Hunk(parse_hunk_number(input)?))
    }
}

fn parse_hunk_number(input: &str) -> Result<NonZeroUsize, RefError> {
    input
        .parse::<NonZeroUsize>()
        .map_err(|_| RefError::InvalidHunkNumber {
            value: input.to_string(),
        })
}

fn parse_line_number(input: &str) -> Result<NonZeroUsize, RefError> {
    input
        .parse::<NonZeroUsize>()
        .map_err(|_| RefError::InvalidLineNumber {
            value: input.to_string(),
        })
}
