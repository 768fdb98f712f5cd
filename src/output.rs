//! Output formatting and styling module.
//!
//! All terminal output of the command-line shell goes through
//! [`OutputFormatter`]: colored status lines, the spinner shown while the
//! worker runs, JSON lines for machine consumption, and the final summary.

use crate::events::{EventLevel, LogEvent, RunSummary};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use reorg::output::OutputFormatter;
    /// OutputFormatter::success("Files have been organized!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints one engine event, styled by its level.
    pub fn event(event: &LogEvent) {
        match event.level {
            EventLevel::Info => Self::plain(&event.message),
            EventLevel::Warning => Self::warning(&event.message),
            EventLevel::Error => Self::error(&event.message),
        }
    }

    /// Prints one engine event as a single line of JSON.
    pub fn event_json(event: &LogEvent) {
        println!("{}", event.to_json());
    }

    /// Creates a spinner for a run whose length is not known up front.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use reorg::output::OutputFormatter;
    /// let spinner = OutputFormatter::create_spinner();
    /// spinner.set_message("organizing");
    /// spinner.finish_and_clear();
    /// ```
    pub fn create_spinner() -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {pos} events {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Prints the totals of a finished run.
    pub fn summary(summary: &RunSummary, dry_run: bool) {
        Self::header("SUMMARY");

        let moved_label = if dry_run { "Would move" } else { "Moved" };
        let rows = [
            (moved_label, summary.moved_files, "file"),
            ("Skipped", summary.skipped_files, "file"),
            ("Removed", summary.removed_folders, "folder"),
        ];

        for (label, count, noun) in rows {
            let noun = if count == 1 {
                noun.to_string()
            } else {
                format!("{}s", noun)
            };
            println!("{:<10} | {} {}", label, count.to_string().green(), noun);
        }

        if summary.aborted {
            Self::error("The run stopped early. Please review errors above.");
        } else if summary.skipped_files > 0 {
            Self::warning("Some files could not be moved. Please review warnings above.");
        }
    }
}
