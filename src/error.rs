//! Error types for git-replant

use thiserror::Error;

/// All errors the library can produce.
///
/// Every fatal variant is detected before any mutating backend call; the one
/// recoverable condition (a conflicted replay) is not an error but a
/// [`ReplayStatus`](crate::types::ReplayStatus).
#[derive(Debug, Error)]
pub enum Error {
    /// A ref name or commit id did not resolve to a commit.
    #[error("'{0}' does not resolve to a commit")]
    InvalidRef(String),

    /// The two refs share no history; there is nothing to compare.
    #[error("'{source_ref}' and '{target_ref}' share no common ancestor")]
    NoCommonAncestor {
        /// The source ref as given by the caller.
        source_ref: String,
        /// The target ref as given by the caller.
        target_ref: String,
    },

    /// Neither `user.name` nor `user.email` is configured and authorship
    /// filtering was requested.
    #[error("no user.name or user.email configured; pass --all to list every author")]
    NoIdentityConfigured,

    /// Root commits and octopus merges cannot be replayed.
    #[error("commit {id} has {count} parents; only single-parent commits and two-parent merges are supported")]
    UnsupportedParentCount {
        /// Abbreviated id of the offending commit.
        id: String,
        /// Its parent count.
        count: usize,
    },

    /// An explicit parent selection matched neither parent of the merge.
    #[error("selection '{selection}' matches neither parent of {id}")]
    SelectionNotAParent {
        /// The selection string as given.
        selection: String,
        /// Abbreviated id of the merge commit.
        id: String,
    },

    /// The operator chose to abort the interactive disambiguation.
    ///
    /// Not a failure as such, but the process must exit non-zero without
    /// touching the repository.
    #[error("aborted")]
    Aborted,

    /// The underlying git invocation failed in a way we cannot interpret.
    #[error("git: {0}")]
    Backend(String),

    /// Catch-all for unexpected internal conditions (terminal I/O, etc).
    #[error("{0}")]
    Internal(String),

    /// I/O error talking to the git child process or the filesystem.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
