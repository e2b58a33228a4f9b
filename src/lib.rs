//! Partial-change selection engine for unified diffs.
//!
//! The core parses diff text into a file/hunk/line model ([`Diff`]), tracks
//! per-line selection outside the model ([`SelectionStore`]), moves a cursor
//! over it ([`Navigator`]), and splits any selection into two complementary
//! patches ([`split`]). [`PatchPick`] wraps the whole pipeline around a git
//! repository: it fetches the diff, applies selection references, and stages
//! the selected half.

use error_set::error_set;
use std::process::Command;

pub mod diff;
pub mod navigate;
pub mod parse;
pub mod select;
pub mod split;

pub use diff::file::FileDiff;
pub use diff::hunk::{HunkDiff, HunkHeader};
pub use diff::line::{LineEntry, LineId, LineKind};
pub use diff::{Diff, ParseError, format_diff};
pub use navigate::Navigator;
pub use parse::{FileSelection, RefError, SelectRef, parse_selection};
pub use select::{SelectError, SelectionStore};
pub use split::{PatchPair, SplitError, split};

error_set! {
    /// Top-level error for patchpick operations
    PatchPickError := {
        #[display("No changes found in {file}")]
        NoChanges { file: String },
        #[display("The given references selected nothing")]
        EmptySelection,
        RefError(RefError),
        ParseError(ParseError),
        SelectError(SelectError),
        SplitError(SplitError),
    } || GitCommandError

    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git diff: {message}")]
        DiffInvocation { message: String },
        #[display("git diff exited with an error: {stderr}")]
        DiffFailed { stderr: String },
        #[display("git diff produced invalid UTF-8: {message}")]
        DiffOutputEncoding { message: String },
        #[display("Failed to run git apply: {message}")]
        ApplyInvocation { message: String },
        #[display("Could not write the patch to git apply: {message}")]
        ApplyPipe { message: String },
        #[display("git apply rejected the patch: {stderr}")]
        ApplyFailed { stderr: String },
    }
}

/// Main interface for selecting and staging changes in one repository.
///
/// Diffs are fetched with zero context (`-U0`) so the ids printed by
/// [`PatchPick::show`] and the patches staged by [`PatchPick::stage`] always
/// refer to the same hunk layout.
pub struct PatchPick<'a> {
    repo_path: &'a str,
}

impl<'a> PatchPick<'a> {
    /// Create a new PatchPick for the given repository path.
    pub fn new(repo_path: &'a str) -> Self {
        Self { repo_path }
    }

    /// Render the unstaged changes with selectable `file:hunk.line` ids.
    ///
    /// Returns an empty string when there is nothing to edit.
    ///
    /// # Examples
    /// ```no_run
    /// # use patchpick::PatchPick;
    /// let picker = PatchPick::new(".");
    /// print!("{}", picker.show(&[]).unwrap());
    /// ```
    pub fn show(&self, files: &[String]) -> Result<String, PatchPickError> {
        let raw = self.raw_diff(files)?;
        if raw.trim().is_empty() {
            return Ok(String::new());
        }
        Ok(format_diff(&Diff::parse(&raw)?))
    }

    /// Split the current diff against the given selection references.
    ///
    /// # Examples
    /// ```no_run
    /// # use patchpick::PatchPick;
    /// let picker = PatchPick::new(".");
    /// let pair = picker.split_refs(&["flake.nix:1".to_string()]).unwrap();
    /// print!("{}", pair.selected);
    /// ```
    pub fn split_refs(&self, refs: &[String]) -> Result<PatchPair, PatchPickError> {
        let selections = refs
            .iter()
            .map(|r| parse_selection(r))
            .collect::<Result<Vec<_>, _>>()?;
        let files: Vec<String> = selections.iter().map(|s| s.file.clone()).collect();

        let raw = self.raw_diff(&files)?;
        if raw.trim().is_empty() {
            return Err(PatchPickError::NoChanges {
                file: files.join(", "),
            });
        }

        let parsed = Diff::parse(&raw)?;
        let mut store = SelectionStore::new(&parsed);
        for selection in &selections {
            apply_selection(&mut store, &parsed, selection)?;
        }
        if store.selected_count() == 0 {
            return Err(PatchPickError::EmptySelection);
        }

        Ok(split(&parsed, &store)?)
    }

    /// Stage the selected changes, leaving the remainder unstaged.
    ///
    /// # Examples
    /// ```no_run
    /// # use patchpick::PatchPick;
    /// let picker = PatchPick::new(".");
    /// picker.stage(&["flake.nix:1".to_string()]).unwrap();
    /// picker.stage(&["config.nix:2.1..3".to_string()]).unwrap();
    /// ```
    pub fn stage(&self, refs: &[String]) -> Result<(), PatchPickError> {
        let pair = self.split_refs(refs)?;
        Ok(self.apply_cached(&pair.selected.to_string())?)
    }

    /// Raw `git diff` output with zero context lines.
    fn raw_diff(&self, files: &[String]) -> Result<String, GitCommandError> {
        let mut args = vec![
            "-C",
            self.repo_path,
            "diff",
            "--no-ext-diff",
            "-U0",
            "--no-color",
        ];
        args.extend(files.iter().map(|s| s.as_str()));

        let output =
            Command::new("git")
                .args(&args)
                .output()
                .map_err(|e| GitCommandError::DiffInvocation {
                    message: e.to_string(),
                })?;

        if !output.status.success() {
            return Err(GitCommandError::DiffFailed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::DiffOutputEncoding {
            message: e.to_string(),
        })
    }

    /// Apply a zero-context patch to the git index.
    fn apply_cached(&self, patch: &str) -> Result<(), GitCommandError> {
        use std::io::Write;

        let mut child = Command::new("git")
            .args([
                "-C",
                self.repo_path,
                "apply",
                "--cached",
                "--unidiff-zero",
                "-",
            ])
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| GitCommandError::ApplyInvocation {
                message: e.to_string(),
            })?;

        child
            .stdin
            .take()
            .ok_or(GitCommandError::ApplyPipe {
                message: "no stdin handle".to_string(),
            })?
            .write_all(patch.as_bytes())
            .map_err(|e| GitCommandError::ApplyPipe {
                message: e.to_string(),
            })?;

        let output = child
            .wait_with_output()
            .map_err(|e| GitCommandError::ApplyInvocation {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(GitCommandError::ApplyFailed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

/// Mark everything one [`FileSelection`] names in the store.
///
/// Hunk and file references that match nothing are no-ops (a hunkless file
/// is a legal target), but a line reference outside the model is a real
/// contract violation and fails.
fn apply_selection(
    store: &mut SelectionStore,
    diff: &Diff,
    selection: &FileSelection,
) -> Result<(), PatchPickError> {
    if diff.file(&selection.file).is_none() {
        return Err(PatchPickError::NoChanges {
            file: selection.file.clone(),
        });
    }

    for select_ref in &selection.refs {
        match select_ref {
            SelectRef::File => store.select_file(&selection.file),
            SelectRef::Hunk(hunk) => store.select_hunk(&selection.file, hunk.get()),
            SelectRef::Line { hunk, line } => {
                store.set(
                    &LineId::new(selection.file.clone(), hunk.get(), line.get()),
                    true,
                )?;
            }
            SelectRef::LineRange { hunk, start, end } => {
                for line in start.get()..=end.get() {
                    store.set(&LineId::new(selection.file.clone(), hunk.get(), line), true)?;
                }
            }
        }
    }

    Ok(())
}
