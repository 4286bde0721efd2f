//! Shared fixtures for git-replant tests

#![allow(dead_code)]

pub mod mock_backend;

pub use mock_backend::{MockBackend, Mutation};

use chrono::{DateTime, Utc};
use git_replant::types::Commit;

/// Alice's identity used throughout the fixtures.
pub const ALICE: (&str, &str) = ("Alice", "alice@example.com");

/// Bob's identity used throughout the fixtures.
pub const BOB: (&str, &str) = ("Bob", "bob@example.com");

/// Build a standalone commit for the pure classification tests.
pub fn make_commit(id: &str, parents: &[&str], message: &str) -> Commit {
    Commit {
        id: id.to_string(),
        author_name: ALICE.0.to_string(),
        author_email: ALICE.1.to_string(),
        authored_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("valid timestamp"),
        parents: parents.iter().map(ToString::to_string).collect(),
        summary: message.lines().next().unwrap_or_default().to_string(),
        message: message.to_string(),
    }
}

/// The standard two-branch fixture:
///
/// ```text
/// ba5e0000 --- a1a1a1a1 --- a2a2a2a2 --- a3a3a3a3   (topic)
///         \
///          -- b1b1b1b1                              (release)
/// ```
///
/// `a2a2a2a2` is Bob's; everything else is Alice's. The release tip's
/// message is caller-provided so tests control which provenance markers the
/// target carries.
pub fn two_branch_fixture(release_tip_message: &str) -> MockBackend {
    MockBackend::new()
        .commit("ba5e0000", &[], ALICE, "initial layout")
        .commit("a1a1a1a1", &["ba5e0000"], ALICE, "add parser")
        .commit("a2a2a2a2", &["a1a1a1a1"], BOB, "add lexer")
        .commit("a3a3a3a3", &["a2a2a2a2"], ALICE, "fix parser corner case")
        .commit("b1b1b1b1", &["ba5e0000"], ALICE, release_tip_message)
        .reference("topic", "a3a3a3a3")
        .reference("release", "b1b1b1b1")
        .identity_config(&[ALICE.0], &[ALICE.1])
}
