//! Provenance trailer parsing and formatting.
//!
//! Two trailer forms record that a commit is a copy of another:
//!
//! - `(cherry picked from commit <id>)` — written by `git cherry-pick -x`
//! - `(with child <id>)` — written by the replay resolver, one line per
//!   commit that lived on the replayed merge's branch side
//!
//! Detection scans the full message body, not just the subject, and returns
//! structured values so callers never touch the regex captures directly.

use regex::Regex;
use std::sync::LazyLock;

/// Label of the trailer git itself writes under `cherry-pick -x`.
pub const CHERRY_PICKED_LABEL: &str = "cherry picked from commit";

/// Label of the trailer the replay resolver writes for merge replays.
pub const WITH_CHILD_LABEL: &str = "with child";

static TRAILER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(cherry picked from commit|with child)\s+([0-9a-f]{7,40})")
        .expect("trailer pattern is valid")
});

/// Which trailer form a match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerKind {
    /// `cherry picked from commit <id>`
    CherryPicked,
    /// `with child <id>`
    WithChild,
}

impl TrailerKind {
    fn from_label(label: &str) -> Self {
        if label == CHERRY_PICKED_LABEL {
            Self::CherryPicked
        } else {
            Self::WithChild
        }
    }
}

/// One provenance trailer found in a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
    /// Which trailer form matched.
    pub kind: TrailerKind,
    /// The referenced commit id, as written (7-40 hex digits).
    pub commit_id: String,
}

/// Scan a full commit message for provenance trailers, in document order.
pub fn scan(message: &str) -> Vec<Trailer> {
    TRAILER_RE
        .captures_iter(message)
        .map(|caps| Trailer {
            kind: TrailerKind::from_label(&caps[1]),
            commit_id: caps[2].to_string(),
        })
        .collect()
}

/// Every commit id referenced by any trailer in the message.
pub fn referenced_ids(message: &str) -> impl Iterator<Item = String> + '_ {
    TRAILER_RE
        .captures_iter(message)
        .map(|caps| caps[2].to_string())
}

/// Format one `with child` trailer line for the given commit id.
///
/// The result is itself matchable by [`scan`], which is what closes the loop
/// between the resolver and the analyzer.
pub fn with_child_line(commit_id: &str) -> String {
    format!("({WITH_CHILD_LABEL} {commit_id})")
}
