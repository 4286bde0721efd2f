//! Terminal styling helpers shared by the CLI commands.
//!
//! All styling goes through `if_supports_color`, so piped output stays
//! plain without any caller-side checks.

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};

/// Check mark used in success summaries.
pub const CHECK: &str = "✓";

/// Styled check mark.
pub fn check() -> String {
    CHECK.success()
}

/// Styled arrow for step listings.
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner style for long-running scans.
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Semantic styling for CLI output.
pub trait Stylize {
    /// De-emphasized secondary text.
    fn muted(&self) -> String;
    /// Highlighted identifiers (commit ids, ref names).
    fn accent(&self) -> String;
    /// Bold leading text.
    fn emphasis(&self) -> String;
    /// Positive outcome.
    fn success(&self) -> String;
    /// Problems and caveats.
    fn warn(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn muted(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.dimmed()))
    }

    fn accent(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.cyan()))
    }

    fn emphasis(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.bold()))
    }

    fn success(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.green()))
    }

    fn warn(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.yellow()))
    }
}
