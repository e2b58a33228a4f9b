use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use patchpick::PatchPick;

#[derive(Parser)]
#[command(name = "patchpick", version)]
#[command(about = "Line- and hunk-level patch selection for git diffs")]
struct Cli {
    /// Repository path to operate on
    #[arg(short = 'C', long = "repo", default_value = ".", global = true)]
    repo: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show unstaged changes with selectable ids (file:hunk.line)
    Show {
        /// Limit output to these files (all files if empty)
        files: Vec<String>,
    },
    /// Stage the referenced changes, leaving the rest unstaged
    Stage {
        /// Selection references (e.g. "flake.nix", "src/lib.rs:2", "a.nix:1.3..5")
        #[arg(required = true)]
        refs: Vec<String>,
    },
    /// Write the selected and remainder patches without touching the index
    Split {
        /// Selection references, as for `stage`
        #[arg(required = true)]
        refs: Vec<String>,
        /// Where to write the selected patch
        #[arg(long, default_value = "selected.patch")]
        selected: String,
        /// Where to write the remainder patch
        #[arg(long, default_value = "remainder.patch")]
        remainder: String,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Render the man page to stdout
    Man,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let picker = PatchPick::new(&cli.repo);

    match cli.command {
        Commands::Show { files } => {
            let listing = picker.show(&files)?;
            if listing.is_empty() {
                eprintln!("No unstaged changes.");
            } else {
                print!("{listing}");
            }
        }
        Commands::Stage { refs } => {
            picker.stage(&refs)?;
        }
        Commands::Split {
            refs,
            selected,
            remainder,
        } => {
            let pair = picker.split_refs(&refs)?;
            std::fs::write(&selected, pair.selected.to_string())?;
            std::fs::write(&remainder, pair.remainder.to_string())?;
            eprintln!("Wrote {selected} and {remainder}");
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "patchpick", &mut io::stdout());
        }
        Commands::Man => {
            clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
        }
    }

    Ok(())
}
