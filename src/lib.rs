//! reorg - reorganize the files in a directory tree
//!
//! This library moves every file below a folder according to a simple
//! strategy: into folders named after their extension, after their first
//! character, into randomly numbered buckets, or back up to the root with
//! emptied folders pruned. Name collisions get a `" (n)"` suffix. Runs report
//! what they do as a stream of events and can run on a background worker.

pub mod cli;
pub mod config;
pub mod conflict;
pub mod events;
pub mod file_organizer;
pub mod organizer;
pub mod output;
pub mod strategy;
pub mod worker;

pub use config::{CompiledFilters, ConfigError, IGNORE_SET, OrganizerConfig};
pub use conflict::resolve_conflict;
pub use events::{EventLevel, LogEvent, RunSummary, WorkerEvent};
pub use file_organizer::{FileOrganizer, MoveOperation, OrganizeError, OrganizeResult};
pub use organizer::Organizer;
pub use strategy::Strategy;
pub use worker::{OrganizeHandle, spawn};

pub use cli::{Cli, run_cli};
