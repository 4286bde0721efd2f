//! Cherry-pick provenance tracking and merge-aware replay for long-lived
//! branches.
//!
//! Two cooperating subsystems over one repository handle:
//!
//! - [`eligibility`] answers "which commits on branch A have not yet been
//!   ported to branch B?", using provenance trailers embedded in commit
//!   messages to recognize already-ported work.
//! - [`replay`] replays a single commit — including two-parent merges —
//!   onto the current position, deciding (or asking) which parent is the
//!   mainline and recording provenance trailers that make the result
//!   visible to future eligibility runs.
//!
//! The version-control backend ([`backend::Backend`]) is consumed as a
//! trusted oracle; this crate adds the provenance and decision layer on top.

pub mod backend;
pub mod cli;
pub mod eligibility;
pub mod error;
pub mod replay;
pub mod trailer;
pub mod types;
