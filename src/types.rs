//! Core types for git-replant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of hex digits shown when abbreviating commit ids for humans.
const SHORT_ID_LEN: usize = 12;

/// An immutable view of a single commit, as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    /// Full hex object id.
    pub id: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// When the commit was authored
    pub authored_at: DateTime<Utc>,
    /// Parent commit ids, in parent order (0, 1 or 2 in this domain)
    pub parents: Vec<String>,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message (includes the first line)
    pub message: String,
}

impl Commit {
    /// Abbreviated id for display.
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(SHORT_ID_LEN)]
    }

    /// Whether this commit has more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// The committer identity configured in the repository.
///
/// Multi-valued: a developer may have several registered names and emails
/// (work and personal, old and new). All of them count as "me".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Every configured `user.name` value.
    pub names: BTreeSet<String>,
    /// Every configured `user.email` value.
    pub emails: BTreeSet<String>,
}

impl Identity {
    /// True when no name and no email is configured.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.emails.is_empty()
    }

    /// Exact-equality authorship test: the commit's author name matches any
    /// configured name, or its email matches any configured email.
    ///
    /// Deliberately no normalization or case folding; git author strings are
    /// compared as stored.
    pub fn wrote(&self, commit: &Commit) -> bool {
        self.names.contains(&commit.author_name) || self.emails.contains(&commit.author_email)
    }
}

/// One line of `log_range` output: a commit id and its subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogLine {
    /// Full hex object id.
    pub id: String,
    /// One-line commit subject.
    pub subject: String,
}

/// Outcome of a backend replay operation.
///
/// A conflict is not an [`Error`](crate::error::Error): the repository is
/// intentionally left mid-replay for the operator, and the process exit code
/// mirrors the backend's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    /// The replay applied cleanly.
    Applied,
    /// The replay stopped with conflicts (or otherwise non-zero status).
    Conflict(i32),
}

impl ReplayStatus {
    /// Process exit code mirroring the backend status.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Applied => 0,
            Self::Conflict(code) => code,
        }
    }

    /// Whether the replay applied cleanly.
    pub const fn is_clean(self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl std::fmt::Display for ReplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::Conflict(code) => write!(f, "conflict (exit {code})"),
        }
    }
}
