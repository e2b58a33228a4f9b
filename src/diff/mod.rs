pub mod file;
pub mod full;
pub mod hunk;
pub mod line;

pub use full::Diff;

use error_set::error_set;

error_set! {
    /// Errors from parsing unified-diff text
    ParseError := {
        /// A `@@` line that does not carry the expected header integers.
        /// Fatal for the whole parse: the splitter's header arithmetic
        /// depends on these values being well-formed.
        #[display("Malformed hunk header '{header}'")]
        MalformedHunkHeader { header: String },
    }
}

/// Format a parsed diff for user display with explicit selectable ids.
///
/// Each line is prefixed with its marker and `hunk.line` id, the reference
/// currency of the `stage` and `split` commands:
///
/// ```text
/// flake.nix:
///   +1.1:	      debug = true;
///
///   +2.1:	        ./flake-modules/home-manager.nix
/// ```
pub fn format_diff(diff: &Diff) -> String {
    use std::fmt::Write;

    let mut result = String::new();

    for file in &diff.files {
        result.push_str(&file.path);
        result.push_str(":\n");

        for hunk in &file.hunks {
            for entry in &hunk.lines {
                let _ = writeln!(
                    result,
                    "  {}{}.{}:\t{}",
                    entry.kind.marker(),
                    hunk.index,
                    entry.id.line,
                    entry.content
                );
            }
            result.push('\n');
        }
    }

    // Remove trailing newline if present
    if result.ends_with("\n\n") {
        result.pop();
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn format_lists_ids_per_hunk() {
        let diff = Diff::parse(
            "diff --git a/f b/f\n@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n",
        )
        .unwrap();
        let formatted = format_diff(&diff);
        insta::assert_snapshot!(formatted, @r"
f:
   1.1:	context
  -1.2:	old
  +1.3:	new1
  +1.4:	new2
");
    }

    #[test]
    fn format_empty_diff_is_empty() {
        let diff = Diff::parse("").unwrap();
        assert_eq!(format_diff(&diff), "");
    }
}
