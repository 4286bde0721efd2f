//! CLI command bodies for the `git-unpicked` and `git-replant` binaries.
//!
//! The binaries themselves only parse arguments and map results to exit
//! codes; everything they print and every backend interaction lives here.

pub mod replay;
pub mod style;
pub mod unpicked;

pub use replay::{ReplayCliOptions, run_replay};
pub use unpicked::{UnpickedOptions, run_unpicked};

use crate::backend::GitBackend;
use crate::error::Result;
use std::path::Path;

/// Open the repository containing `path` (shared setup for both commands).
pub fn open_backend(path: &Path) -> Result<GitBackend> {
    GitBackend::discover(path)
}

/// Install the tracing subscriber for a binary: `RUST_LOG`-filtered,
/// stderr-only so stdout stays scriptable.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
