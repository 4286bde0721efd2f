//! Version-control backend abstraction.
//!
//! The core never reimplements commit storage or diffing; it consumes a
//! backend's query primitives as a trusted oracle. This trait captures
//! exactly the capabilities the analyzer and the resolver need, allowing the
//! same logic to run against the real `git` binary or an in-memory test
//! double.

mod git;

pub use git::GitBackend;

use crate::error::Result;
use crate::types::{Commit, Identity, LogLine, ReplayStatus};

/// A lazy, non-restartable ancestry walk. Dropping it early abandons the
/// remainder of the walk.
pub type CommitWalk<'a> = Box<dyn Iterator<Item = Result<Commit>> + 'a>;

/// Query and mutation primitives of the underlying version-control system.
///
/// Queries never mutate the repository. The mutating operations are the
/// replay applications and the message edits; a single resolver invocation
/// performs at most one replay and one message write.
pub trait Backend {
    /// Resolve a ref name (branch, tag, abbreviated or full id) to a commit.
    fn resolve_ref(&self, name: &str) -> Result<Commit>;

    /// Nearest common ancestor of two commits, or `None` when their
    /// histories are disjoint.
    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>>;

    /// Walk ancestors of `start` in reverse-topological (newest-first)
    /// order. With `stop_before: Some(base)` the walk covers the half-open
    /// range `base..start`: commits reachable from `start` but not from
    /// `base`, never crossing into `base` or its history.
    fn walk_ancestors(&self, start: &str, stop_before: Option<&str>) -> Result<CommitWalk<'_>>;

    /// The configured committer identity. Every configured name and email is
    /// returned, not just the first.
    fn identity(&self) -> Result<Identity>;

    /// Ids and subjects of `from..to`, newest-first.
    fn log_range(&self, from_exclusive: &str, to_inclusive: &str) -> Result<Vec<LogLine>>;

    /// Patch text between two commits.
    fn diff_range(&self, from_exclusive: &str, to_inclusive: &str) -> Result<String>;

    /// Human-readable commit graph of `from..to`.
    fn graph_range(&self, from_exclusive: &str, to_inclusive: &str) -> Result<String>;

    /// Replay a single-parent commit onto the current position, recording
    /// cherry-pick provenance. `commit_directly: false` stages only.
    fn apply_single_parent(&self, commit_id: &str, commit_directly: bool) -> Result<ReplayStatus>;

    /// Replay a merge commit as the diff against its `mainline`-th parent
    /// (1-based), recording cherry-pick provenance.
    fn apply_with_mainline(
        &self,
        commit_id: &str,
        mainline: usize,
        commit_directly: bool,
    ) -> Result<ReplayStatus>;

    /// Full message of the commit at the current position.
    fn read_head_message(&self) -> Result<String>;

    /// Replace the message of the commit at the current position.
    fn amend_head_message(&self, message: &str) -> Result<()>;

    /// Append text to the pending merge message, picked up by the next
    /// manual commit after a conflicted or staged-only replay.
    fn append_pending_merge_message(&self, text: &str) -> Result<()>;
}
