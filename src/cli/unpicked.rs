//! Unpicked command - list commits not yet ported to the target branch

use crate::cli::open_backend;
use crate::cli::style::{Stylize, spinner_style};
use crate::eligibility::{EligibilityOptions, find_unpicked};
use crate::error::{Error, Result};
use anstream::println;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;

/// Options for the unpicked command
#[derive(Debug, Clone, Default)]
pub struct UnpickedOptions {
    /// Inclusive lower bound commit for the source walk
    pub since: Option<String>,
    /// List commits from every author, with authorship shown per line
    pub all: bool,
    /// Emit one JSON object per commit instead of the human format
    pub json: bool,
}

/// Run the unpicked command
pub fn run_unpicked(path: &Path, source: &str, target: &str, options: &UnpickedOptions) -> Result<()> {
    let backend = open_backend(path)?;

    // Building the cherrypicked set walks the whole target range up front;
    // that is the one phase worth a spinner. Skipped in JSON mode to keep
    // stderr quiet for scripts.
    let spinner = if options.json {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!("Scanning {} history...", target.emphasis()));
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    };

    let eligibility = EligibilityOptions {
        since: options.since.clone(),
        all_authors: options.all,
    };
    let result = find_unpicked(&backend, source, target, &eligibility);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let mut commits = result?;
    for commit in commits.by_ref() {
        let commit = commit?;
        if options.json {
            let line = serde_json::to_string(&commit)
                .map_err(|e| Error::Internal(format!("failed to encode commit: {e}")))?;
            println!("{line}");
        } else if options.all {
            println!(
                "{} {} {} {} {}",
                commit.short_id().accent(),
                commit.summary,
                "|".muted(),
                commit.author_name.muted(),
                commit.author_email.muted()
            );
        } else {
            println!("{} {}", commit.short_id().accent(), commit.summary);
        }
    }

    if !options.json {
        let skipped = commits.skipped_as_ported();
        if skipped > 0 {
            eprintln!("{}", format!("{skipped} already picked").muted());
        }
    }

    Ok(())
}
