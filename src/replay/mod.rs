//! Replay resolution for single commits, merges included.
//!
//! Split in the usual three phases:
//! 1. Gather — resolve the commit and (for merges) the parents' merge-base
//! 2. Plan — classify the parents and pick a mainline (pure, testable)
//! 3. Execute — drive the backend replay and write provenance (effectful)
//!
//! The interactive disambiguation between two merge parents is its own pure
//! state machine in [`prompt`]; the CLI is only a thin driver around it.

mod execute;
mod plan;
pub mod prompt;

pub use execute::{
    ReplayOutcome, append_trailers, branch_segment, child_trailer_block, dry_run_operations,
    execute_replay,
};
pub use plan::{MergeParents, MergeResolution, ParentSlot, Resolution, Resolved, choose, resolve_parents};
