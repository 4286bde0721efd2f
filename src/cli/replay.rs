//! Replay command - replay one commit, merges included, onto HEAD

use crate::backend::Backend;
use crate::cli::open_backend;
use crate::cli::style::{Stylize, arrow, check};
use crate::error::{Error, Result};
use crate::replay::prompt::{HELP, HINT, InfoRequest, PromptStep, advance, parse_action};
use crate::replay::{
    MergeParents, MergeResolution, ParentSlot, Resolution, Resolved, branch_segment, choose,
    dry_run_operations, execute_replay, resolve_parents,
};
use anstream::println;
use dialoguer::Input;
use std::path::Path;

/// Options for the replay command
#[derive(Debug, Clone, Default)]
pub struct ReplayCliOptions {
    /// Stage the changes without committing
    pub no_commit: bool,
    /// Explicit parent selection (full id or prefix) for ambiguous merges
    pub select: Option<String>,
    /// Print the exact operations instead of executing them
    pub dry_run: bool,
}

/// Run the replay command. Returns the process exit code, which mirrors the
/// underlying replay status.
pub fn run_replay(path: &Path, commit_ref: &str, options: &ReplayCliOptions) -> Result<i32> {
    let backend = open_backend(path)?;
    let commit = backend.resolve_ref(commit_ref)?;
    let commit_directly = !options.no_commit;

    // The merge-base of the parent *pair*: equality against it is what
    // detects a fast-forwarded side.
    let common = match commit.parents.as_slice() {
        [first, second] => backend.merge_base(first, second)?,
        _ => None,
    };

    let resolved = match resolve_parents(&commit, common.as_deref(), options.select.as_deref())? {
        Resolution::Linear { selection_ignored } => {
            if selection_ignored {
                println!(
                    "{}",
                    "warning: --select has no meaning for a non-merge commit; ignoring".warn()
                );
            }
            Resolved::Linear
        }
        Resolution::Merge(resolution) => {
            println!(
                "{} {}",
                format!("Mainline is parent {}", resolution.mainline).muted(),
                format!("({})", short(&resolution.mainline_id)).muted()
            );
            Resolved::Merge(resolution)
        }
        Resolution::NeedsChoice(parents) => {
            let resolution = prompt_for_mainline(&backend, &commit, &parents)?;
            Resolved::Merge(resolution)
        }
    };

    if options.dry_run {
        let children = match &resolved {
            Resolved::Merge(resolution) => branch_segment(&backend, resolution)?,
            Resolved::Linear => Vec::new(),
        };
        println!("{}:", "Would run".emphasis());
        for op in dry_run_operations(&commit, &resolved, &children, commit_directly) {
            println!("  {} {op}", arrow());
        }
        return Ok(0);
    }

    let outcome = execute_replay(&backend, &commit, &resolved, commit_directly)?;

    println!();
    if outcome.status.is_clean() {
        if commit_directly {
            println!(
                "{} Replayed {}",
                check(),
                commit.short_id().accent()
            );
            if outcome.amended {
                println!(
                    "  {}",
                    format!("{} provenance trailer(s) recorded", outcome.children.len()).muted()
                );
            }
        } else {
            println!(
                "{} Staged changes from {}",
                check(),
                commit.short_id().accent()
            );
            if !outcome.children.is_empty() {
                println!(
                    "  {}",
                    "trailers appended to the pending merge message".muted()
                );
            }
        }
    } else {
        println!(
            "{} Replay of {} stopped: {}",
            "!".warn(),
            commit.short_id().accent(),
            outcome.status
        );
        println!(
            "  {}",
            "resolve the conflicts and commit to finish; provenance is already in the merge message".muted()
        );
    }

    Ok(outcome.status.exit_code())
}

/// Drive the interactive disambiguation loop until a choice or an abort.
///
/// Blocks on operator input indefinitely; only an explicit abort ends it
/// without a decision.
fn prompt_for_mainline(
    backend: &dyn Backend,
    commit: &crate::types::Commit,
    parents: &MergeParents,
) -> Result<MergeResolution> {
    println!(
        "{} {} {}",
        "Ambiguous merge".emphasis(),
        commit.short_id().accent(),
        commit.summary
    );
    for slot in [ParentSlot::First, ParentSlot::Second] {
        let parent = backend.resolve_ref(parents.id(slot))?;
        println!(
            "  {}) {} {}",
            slot,
            parent.short_id().accent(),
            parent.summary
        );
    }
    match parents.common.as_deref() {
        Some(common) => println!("  {}", format!("common ancestor {}", short(common)).muted()),
        None => println!("  {}", "parents share no common ancestor".warn()),
    }

    loop {
        let input: String = Input::new()
            .with_prompt(format!("Replay which parent? {HINT}"))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Internal(format!("failed to read choice: {e}")))?;

        let Some(action) = parse_action(&input) else {
            println!("{}", format!("unrecognized input; {HINT} or ? for help").muted());
            continue;
        };

        match advance(action) {
            PromptStep::Chosen(slot) => return Ok(choose(parents, slot)),
            PromptStep::Aborted => return Err(Error::Aborted),
            PromptStep::ShowHelp => println!("{HELP}"),
            PromptStep::Show(request) => render_info(backend, commit, parents, request)?,
        }
    }
}

/// Render one piece of requested information inside the prompt loop.
fn render_info(
    backend: &dyn Backend,
    commit: &crate::types::Commit,
    parents: &MergeParents,
    request: InfoRequest,
) -> Result<()> {
    match request {
        InfoRequest::Graph => match parents.common.as_deref() {
            Some(common) => println!("{}", backend.graph_range(common, &commit.id)?),
            None => println!("{}", "no common ancestor to graph from".warn()),
        },
        InfoRequest::Log(slot) => {
            let lines = backend.log_range(inspect_base(parents, slot), parents.id(slot))?;
            if lines.is_empty() {
                println!("  {}", "(no private commits)".muted());
            }
            for line in lines {
                println!("  {} {}", short(&line.id).accent(), line.subject);
            }
        }
        InfoRequest::Diff(slot) => {
            println!(
                "{}",
                backend.diff_range(inspect_base(parents, slot), parents.id(slot))?
            );
        }
    }
    Ok(())
}

/// Lower bound for inspecting one parent's private segment: the pair
/// merge-base, or the other parent when the pair has none.
fn inspect_base(parents: &MergeParents, slot: ParentSlot) -> &str {
    parents
        .common
        .as_deref()
        .unwrap_or_else(|| parents.id(slot.other()))
}

fn short(id: &str) -> &str {
    &id[..id.len().min(12)]
}
