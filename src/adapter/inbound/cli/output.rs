//! Shared CLI output helpers for consistent operator-facing text.

use std::fmt::Display;

use owo_colors::OwoColorize;

use crate::domain::price::Provenance;

const RULE_WIDTH: usize = 56;
const BAR_WIDTH: usize = 24;

/// Print a section header and separator.
pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a simple key/value line.
pub fn key_value(label: &str, value: impl Display) {
    println!("{label:<16} {value}");
}

/// Print a successful status line.
pub fn ok(message: &str) {
    println!("{} {message}", "✓".green());
}

/// Print a warning status line.
pub fn warn(message: &str) {
    println!("{} {message}", "⚠".yellow());
}

/// Print an error status line.
pub fn error(message: &str) {
    eprintln!("{} {message}", "✗".red());
}

/// Print a single-line note.
pub fn note(message: &str) {
    println!("{message}");
}

/// A provenance tag colored by trustworthiness.
#[must_use]
pub fn provenance_label(provenance: Provenance) -> String {
    match provenance {
        Provenance::Live => provenance.to_string().green().to_string(),
        Provenance::Cached => provenance.to_string().yellow().to_string(),
        Provenance::Default => provenance.to_string().red().to_string(),
    }
}

/// Render a fixed-width progress bar like `[██████··················] 25%`.
#[must_use]
pub fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!(
        "[{}{}] {percent}%",
        "█".repeat(filled),
        "·".repeat(BAR_WIDTH - filled)
    )
}
