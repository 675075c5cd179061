//! Terminal styling helpers shared by CLI commands

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Check mark used in success lines
pub const CHECK: &str = "✓";

/// Cross used for failures
pub const CROSS: &str = "✗";

/// Semantic colors for terminal output
///
/// Colors are dropped automatically when stdout is not a terminal.
pub trait Stylize: Display + Sized {
    /// Headings and labels
    fn emphasis(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.bold()))
    }

    /// Branch names, counts and other values
    fn accent(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.cyan()))
    }

    /// Secondary information
    fn muted(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.dimmed()))
    }

    /// Positive outcomes
    fn success(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.green()))
    }

    /// Risky or partial outcomes
    fn warn(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.yellow()))
    }

    /// Failures and high risk
    fn danger(&self) -> String {
        format!("{}", self.if_supports_color(Stream::Stdout, |t| t.red()))
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.danger()
}

/// Bullet arrow for list items
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner used while collecting diffs
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// Bar used while dry-merging pairs
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
