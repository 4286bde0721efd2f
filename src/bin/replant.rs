//! `git-replant` — replay one commit, merges included, onto the current
//! branch.

use clap::Parser;
use git_replant::cli::style::Stylize;
use git_replant::cli::{ReplayCliOptions, init_tracing, run_replay};
use git_replant::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Replay COMMIT onto HEAD. For a two-parent merge the mainline parent is
/// detected, selected with --select, or chosen interactively; the replayed
/// commit records provenance trailers so it is skipped by git-unpicked.
#[derive(Debug, Parser)]
#[command(name = "git-replant", version, about)]
struct Cli {
    /// Stage the changes without committing
    #[arg(short = 'n', long)]
    no_commit: bool,

    /// Parent to replay for an ambiguous merge (full id or prefix)
    #[arg(short = 's', long, value_name = "PARENT")]
    select: Option<String>,

    /// Print the exact operations instead of executing them
    #[arg(long)]
    dry_run: bool,

    /// Repository to operate on (any directory inside it)
    #[arg(long, value_name = "DIR", default_value = ".")]
    path: PathBuf,

    /// The commit to replay
    commit: String,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let options = ReplayCliOptions {
        no_commit: cli.no_commit,
        select: cli.select,
        dry_run: cli.dry_run,
    };

    match run_replay(&cli.path, &cli.commit, &options) {
        Ok(code) => u8::try_from(code.clamp(0, 255)).map_or(ExitCode::FAILURE, ExitCode::from),
        Err(Error::Aborted) => {
            eprintln!("{}", "Aborted".muted());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".warn());
            ExitCode::FAILURE
        }
    }
}
