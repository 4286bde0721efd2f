//! `git-unpicked` — list commits on a source branch not yet cherry-picked
//! onto a target branch.

use clap::Parser;
use git_replant::cli::style::Stylize;
use git_replant::cli::{UnpickedOptions, init_tracing, run_unpicked};
use std::path::PathBuf;
use std::process::ExitCode;

/// List commits present on SOURCE but not yet ported (by cherry-pick
/// provenance) to TARGET.
#[derive(Debug, Parser)]
#[command(name = "git-unpicked", version, about)]
struct Cli {
    /// Stop the listing at this commit (inclusive)
    #[arg(long, value_name = "COMMIT")]
    since: Option<String>,

    /// List commits from every author, showing authorship per line
    #[arg(long)]
    all: bool,

    /// Emit one JSON object per commit
    #[arg(long)]
    json: bool,

    /// Repository to operate on (any directory inside it)
    #[arg(long, value_name = "DIR", default_value = ".")]
    path: PathBuf,

    /// Branch whose commits are candidates for porting
    source: String,

    /// Branch the commits would be ported to
    #[arg(default_value = "HEAD")]
    target: String,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let options = UnpickedOptions {
        since: cli.since,
        all: cli.all,
        json: cli.json,
    };

    match run_unpicked(&cli.path, &cli.source, &cli.target, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".warn());
            ExitCode::FAILURE
        }
    }
}
