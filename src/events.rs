//! Structured events emitted while a folder is being reorganized.
//!
//! The engine reports everything it does as a stream of [`LogEvent`]s. A
//! run that goes through [`crate::worker`] additionally ends with a single
//! [`WorkerEvent::Finished`] carrying the [`RunSummary`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    /// A file was moved or a folder removed.
    Info,
    /// One file or folder was skipped; the run continues.
    Warning,
    /// The run was aborted.
    Error,
}

/// A single line of the run's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: EventLevel,
    pub message: String,
}

impl LogEvent {
    fn new(level: EventLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(EventLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(EventLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EventLevel::Error, message)
    }

    /// Renders the event as a single JSON object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"message\":{:?}}}", self.message))
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Totals for one organize run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Files moved (or, in a dry run, that would be moved).
    pub moved_files: usize,
    /// Files left in place after a recovered move failure.
    pub skipped_files: usize,
    /// Empty folders removed.
    pub removed_folders: usize,
    /// Set when an unexpected error stopped the run early.
    pub aborted: bool,
}

impl RunSummary {
    /// Returns true if every eligible file was handled and nothing aborted.
    pub fn is_complete_success(&self) -> bool {
        !self.aborted && self.skipped_files == 0
    }
}

/// Messages sent from the background worker to whoever started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// A log line from the running engine.
    Log(LogEvent),
    /// The run is over. Always the last event, sent exactly once.
    Finished(RunSummary),
}
