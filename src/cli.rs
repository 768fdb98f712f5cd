//! Command-line interface module for reorg.
//!
//! This module is the thin shell around the engine. It handles:
//! - Argument parsing
//! - Folder and strategy validation before anything is touched
//! - Loading configuration and file filters
//! - Starting the background worker and printing its events

use crate::config::OrganizerConfig;
use crate::events::{RunSummary, WorkerEvent};
use crate::file_organizer::OrganizeError;
use crate::organizer::Organizer;
use crate::output::OutputFormatter;
use crate::strategy::Strategy;
use crate::worker;
use clap::Parser;
use std::path::PathBuf;

/// Reorganize the files in a folder.
#[derive(Debug, Clone, Parser)]
#[command(name = "reorg", version, about)]
pub struct Cli {
    /// Folder to reorganize. Surrounding quotes are ignored.
    pub folder: String,

    /// How to reorganize: extension, alphanumeric, random, unorganize
    /// (or flatten), scramble. Full labels such as "File Extension" work too.
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Show what would be moved without changing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print events as JSON lines instead of colored text.
    #[arg(long)]
    pub json: bool,

    /// Configuration file (defaults to .reorgrc.toml, then ~/.config/reorg/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Turns user input into the folder to organize.
///
/// Surrounding `"` and `'` characters are stripped, as pasted paths often
/// carry them.
///
/// # Errors
///
/// Returns [`OrganizeError::InvalidFolder`] if the input is empty or does not
/// name an existing directory.
///
/// # Examples
///
/// ```no_run
/// use reorg::cli::validate_folder;
///
/// let folder = validate_folder("'/home/me/Downloads'").expect("folder should exist");
/// assert_eq!(folder.to_str(), Some("/home/me/Downloads"));
/// ```
pub fn validate_folder(input: &str) -> Result<PathBuf, OrganizeError> {
    let trimmed = input.trim_matches(|c| c == '"' || c == '\'');
    let folder = PathBuf::from(trimmed);

    if trimmed.is_empty() || !folder.is_dir() {
        return Err(OrganizeError::InvalidFolder { path: folder });
    }

    Ok(folder)
}

/// Picks the strategy: the command-line value, else the configured default,
/// else [`Strategy::ByExtension`].
///
/// # Errors
///
/// Returns [`OrganizeError::InvalidStrategy`] if the chosen name is unknown.
pub fn resolve_strategy(
    requested: Option<&str>,
    config: &OrganizerConfig,
) -> Result<Strategy, OrganizeError> {
    match requested.or(config.organize.strategy.as_deref()) {
        Some(name) => name.parse(),
        None => Ok(Strategy::ByExtension),
    }
}

/// Runs the command-line application.
///
/// Validation failures are reported before the worker starts; once it has
/// started, the run always completes and its summary is returned.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use reorg::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["reorg", "/path/to/folder", "--strategy", "extension"]);
/// match run_cli(&cli) {
///     Ok(summary) => println!("{} files moved", summary.moved_files),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunSummary, String> {
    let config = OrganizerConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    let strategy = resolve_strategy(cli.strategy.as_deref(), &config).map_err(|e| {
        OutputFormatter::error("Invalid organize method selected!");
        e.to_string()
    })?;

    let folder = validate_folder(&cli.folder).map_err(|e| {
        OutputFormatter::error("Invalid folder was selected, nothing to organize!");
        e.to_string()
    })?;

    let filters = config
        .compile_filters()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    if !cli.json {
        OutputFormatter::info(&format!("Organizing files by: {}", strategy.label()));
        OutputFormatter::info(&format!("Organizing files in folder: {}", folder.display()));
        if cli.dry_run {
            OutputFormatter::dry_run_notice("No files will be moved.");
        }
    }

    let organizer = Organizer::new(folder, strategy)
        .with_filters(filters)
        .dry_run(cli.dry_run);

    let summary = if cli.json {
        drain_json(worker::spawn(organizer))
    } else {
        drain_styled(worker::spawn(organizer))
    };

    if cli.json {
        let line = serde_json::to_string(&summary)
            .map_err(|e| format!("Error serializing summary: {}", e))?;
        println!("{}", line);
    } else {
        if cli.dry_run {
            OutputFormatter::success("Dry run complete. No files were modified.");
        } else {
            OutputFormatter::success("Files have been organized!");
        }
        OutputFormatter::summary(&summary, cli.dry_run);
    }

    Ok(summary)
}

fn drain_styled(handle: worker::OrganizeHandle) -> RunSummary {
    let spinner = OutputFormatter::create_spinner();
    let mut summary = None;

    for event in handle {
        match event {
            WorkerEvent::Log(log) => {
                spinner.suspend(|| OutputFormatter::event(&log));
                spinner.inc(1);
            }
            WorkerEvent::Finished(done) => summary = Some(done),
        }
    }

    spinner.finish_and_clear();
    summary.unwrap_or(RunSummary {
        aborted: true,
        ..RunSummary::default()
    })
}

fn drain_json(handle: worker::OrganizeHandle) -> RunSummary {
    handle.wait(|log| OutputFormatter::event_json(&log))
}
