//! Replay execution — effectful operations.
//!
//! Takes a [`Resolved`] classification (produced by the pure planning
//! functions) and drives the backend replay, then writes the provenance
//! trailers that make the new commit visible to future eligibility runs.

use crate::backend::Backend;
use crate::error::Result;
use crate::replay::plan::{MergeResolution, Resolved};
use crate::trailer;
use crate::types::{Commit, LogLine, ReplayStatus};
use tracing::{debug, warn};

/// What a replay invocation did.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// Backend status; the process exit code mirrors it.
    pub status: ReplayStatus,
    /// The branch side's private commits, oldest-first (empty for linear
    /// replays).
    pub children: Vec<LogLine>,
    /// Whether the new commit's message was amended in place with the
    /// `with child` trailers.
    pub amended: bool,
}

/// Execute a decided replay.
///
/// For merges, the branch side's private segment is read *before* the
/// mutating call, so a failure to enumerate it cannot leave a half-done
/// replay. After the apply:
///
/// - clean and committing directly: the fresh commit's message is read back,
///   the trailer block appended, and the commit amended in place;
/// - conflicted or staging-only: the block goes to the pending merge
///   message, to be picked up by the operator's eventual commit.
pub fn execute_replay(
    backend: &dyn Backend,
    commit: &Commit,
    resolved: &Resolved,
    commit_directly: bool,
) -> Result<ReplayOutcome> {
    match resolved {
        Resolved::Linear => {
            debug!(id = %commit.short_id(), "linear replay");
            let status = backend.apply_single_parent(&commit.id, commit_directly)?;
            if !status.is_clean() {
                warn!(id = %commit.short_id(), %status, "replay stopped");
            }
            Ok(ReplayOutcome {
                status,
                children: Vec::new(),
                amended: false,
            })
        }
        Resolved::Merge(resolution) => execute_merge(backend, commit, resolution, commit_directly),
    }
}

fn execute_merge(
    backend: &dyn Backend,
    commit: &Commit,
    resolution: &MergeResolution,
    commit_directly: bool,
) -> Result<ReplayOutcome> {
    let children = branch_segment(backend, resolution)?;
    debug!(
        id = %commit.short_id(),
        mainline = %resolution.mainline,
        children = children.len(),
        "merge replay"
    );

    let status =
        backend.apply_with_mainline(&commit.id, resolution.mainline.index(), commit_directly)?;

    let block = child_trailer_block(&children);
    let mut amended = false;
    if !block.is_empty() {
        if status.is_clean() && commit_directly {
            let message = backend.read_head_message()?;
            backend.amend_head_message(&append_trailers(&message, &block))?;
            amended = true;
        } else {
            // Conflicted or staged-only: leave the trailers where the next
            // manual commit will find them.
            backend.append_pending_merge_message(&format!("\n{block}"))?;
        }
    }

    if !status.is_clean() {
        warn!(id = %commit.short_id(), %status, "replay stopped; repository left mid-replay");
    }

    Ok(ReplayOutcome {
        status,
        children,
        amended,
    })
}

/// The branch side's private commits, oldest-first.
pub fn branch_segment(backend: &dyn Backend, resolution: &MergeResolution) -> Result<Vec<LogLine>> {
    let mut lines = backend.log_range(&resolution.segment_base, &resolution.branch_id)?;
    lines.reverse();
    Ok(lines)
}

/// One `with child` trailer line per branch-side commit, oldest-first,
/// newline-terminated. Empty when there are no children.
pub fn child_trailer_block(children: &[LogLine]) -> String {
    let mut block = String::new();
    for child in children {
        block.push_str(&trailer::with_child_line(&child.id));
        block.push('\n');
    }
    block
}

/// Append a trailer block to a commit message, blank-line separated.
pub fn append_trailers(message: &str, block: &str) -> String {
    format!("{}\n\n{}", message.trim_end(), block)
}

/// The exact operations a replay would perform, for `--dry-run` output.
///
/// Pure: the caller gathers the branch segment (a read-only query) first.
pub fn dry_run_operations(
    commit: &Commit,
    resolved: &Resolved,
    children: &[LogLine],
    commit_directly: bool,
) -> Vec<String> {
    let no_commit = if commit_directly { "" } else { " --no-commit" };
    match resolved {
        Resolved::Linear => {
            vec![format!("git cherry-pick -x{no_commit} {}", commit.id)]
        }
        Resolved::Merge(resolution) => {
            let mut ops = vec![format!(
                "git cherry-pick -x -m {}{no_commit} {}",
                resolution.mainline.index(),
                commit.id
            )];
            for child in children {
                ops.push(format!("record trailer: {}", trailer::with_child_line(&child.id)));
            }
            if !children.is_empty() {
                if commit_directly {
                    ops.push("amend the new commit's message with the recorded trailers".to_string());
                } else {
                    ops.push("append the recorded trailers to the pending merge message".to_string());
                }
            }
            ops
        }
    }
}
