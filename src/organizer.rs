//! The traversal and dispatch engine.
//!
//! An [`Organizer`] walks the folder once, asks its [`Strategy`] where each
//! eligible file belongs, and moves it there. Everything that happens is
//! reported as a [`LogEvent`] through a caller-supplied sink; the engine never
//! prints anything itself.
//!
//! The list of files is taken before the first move, so folders created
//! during a run are not walked again in that same run. Constructive
//! strategies walk parents before children. Flattening walks children
//! before parents so that a folder can be removed as soon as its own
//! contents have been moved out.

use crate::config::CompiledFilters;
use crate::events::{LogEvent, RunSummary};
use crate::file_organizer::{FileOrganizer, OrganizeError, OrganizeResult};
use crate::strategy::Strategy;
use rand::Rng;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One entry of the traversal snapshot.
#[derive(Debug)]
enum Entry {
    File(PathBuf),
    Folder(PathBuf),
}

/// Reorganizes the files below one root folder.
///
/// # Examples
///
/// ```no_run
/// use reorg::organizer::Organizer;
/// use reorg::strategy::Strategy;
///
/// let summary = Organizer::new("/home/me/Downloads", Strategy::ByExtension)
///     .run(|event| println!("{}", event));
/// println!("{} files moved", summary.moved_files);
/// ```
#[derive(Debug, Clone)]
pub struct Organizer {
    root: PathBuf,
    strategy: Strategy,
    filters: CompiledFilters,
    dry_run: bool,
}

impl Organizer {
    /// Creates an organizer that only skips the fixed ignore set.
    pub fn new(root: impl Into<PathBuf>, strategy: Strategy) -> Self {
        Self {
            root: root.into(),
            strategy,
            filters: CompiledFilters::default(),
            dry_run: false,
        }
    }

    /// Replaces the file filters. The ignore set always applies.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// When enabled, reports what would be moved without touching anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Runs the organizer, passing every event to `emit`.
    ///
    /// Never fails: per-file problems become warnings and the run goes on;
    /// anything else stops the run with an `An error occurred: ...` event and
    /// a summary marked as aborted.
    pub fn run<F>(&self, emit: F) -> RunSummary
    where
        F: FnMut(LogEvent),
    {
        self.run_with_rng(&mut rand::thread_rng(), emit)
    }

    /// Same as [`Organizer::run`], drawing random buckets from `rng`.
    pub fn run_with_rng<R, F>(&self, rng: &mut R, mut emit: F) -> RunSummary
    where
        R: Rng + ?Sized,
        F: FnMut(LogEvent),
    {
        let mut summary = RunSummary::default();

        if let Err(e) = self.try_run(rng, &mut emit, &mut summary) {
            emit(LogEvent::error(format!("An error occurred: {}", e)));
            summary.aborted = true;
        }

        summary
    }

    /// Runs the organizer and collects the events instead of streaming them.
    pub fn run_collect(&self) -> (Vec<LogEvent>, RunSummary) {
        let mut events = Vec::new();
        let summary = self.run(|event| events.push(event));
        (events, summary)
    }

    fn try_run<R, F>(&self, rng: &mut R, emit: &mut F, summary: &mut RunSummary) -> OrganizeResult<()>
    where
        R: Rng + ?Sized,
        F: FnMut(LogEvent),
    {
        if !self.root.is_dir() {
            return Err(OrganizeError::InvalidFolder {
                path: self.root.clone(),
            });
        }

        for entry in self.snapshot(emit)? {
            match entry {
                Entry::File(path) => self.process_file(&path, rng, emit, summary)?,
                Entry::Folder(path) => self.remove_if_empty(&path, emit, summary)?,
            }
        }

        Ok(())
    }

    /// Lists every eligible file, plus every folder when walking bottom-up.
    fn snapshot<F>(&self, emit: &mut F) -> OrganizeResult<Vec<Entry>>
    where
        F: FnMut(LogEvent),
    {
        // Fail loudly if the root itself can't be listed.
        fs::read_dir(&self.root).map_err(|e| OrganizeError::TraversalFailed {
            path: self.root.clone(),
            source: e,
        })?;

        let bottom_up = self.strategy.is_bottom_up();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .contents_first(bottom_up)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(self.root.as_path());
                    emit(LogEvent::warning(format!(
                        "Could not read {}, skipping.",
                        path.display()
                    )));
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_file() {
                let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
                if self.filters.should_include(relative) {
                    entries.push(Entry::File(entry.into_path()));
                }
            } else if file_type.is_dir() && bottom_up {
                entries.push(Entry::Folder(entry.into_path()));
            }
        }

        Ok(entries)
    }

    fn process_file<R, F>(
        &self,
        path: &Path,
        rng: &mut R,
        emit: &mut F,
        summary: &mut RunSummary,
    ) -> OrganizeResult<()>
    where
        R: Rng + ?Sized,
        F: FnMut(LogEvent),
    {
        let Some(folder) = self.strategy.destination_folder(&self.root, path, rng) else {
            return Ok(());
        };

        // Already where it belongs.
        if path.parent() == Some(folder.as_path()) {
            return Ok(());
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = self.describe_target(&folder);

        if self.dry_run {
            FileOrganizer::plan_move(path, &folder)?;
            emit(LogEvent::info(format!("Would move {} to {}", file_name, target)));
            summary.moved_files += 1;
            return Ok(());
        }

        match FileOrganizer::move_into(path, &folder) {
            Ok(_) => {
                emit(LogEvent::info(format!("Moved {} to {}", file_name, target)));
                summary.moved_files += 1;
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                emit(LogEvent::warning(format!(
                    "Error while moving {}, skipping.",
                    file_name
                )));
                summary.skipped_files += 1;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn describe_target(&self, folder: &Path) -> String {
        if self.strategy == Strategy::Flatten {
            "root folder".to_string()
        } else {
            folder.display().to_string()
        }
    }

    /// Removes `folder` if nothing is left in it.
    fn remove_if_empty<F>(&self, folder: &Path, emit: &mut F, summary: &mut RunSummary) -> OrganizeResult<()>
    where
        F: FnMut(LogEvent),
    {
        if self.dry_run {
            return Ok(());
        }

        let is_empty = match fs::read_dir(folder) {
            Ok(mut contents) => contents.next().is_none(),
            // Unreadable folders were already reported by the walk.
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => false,
            Err(e) => {
                return Err(OrganizeError::DirectoryRemovalFailed {
                    path: folder.to_path_buf(),
                    source: e,
                });
            }
        };
        if !is_empty {
            return Ok(());
        }

        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match Self::remove_folder(folder) {
            Ok(()) => {
                emit(LogEvent::info(format!("Removed empty folder: {}", name)));
                summary.removed_folders += 1;
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                emit(LogEvent::warning(format!(
                    "Permission error while removing folder {}, skipping.",
                    name
                )));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn remove_folder(folder: &Path) -> OrganizeResult<()> {
        fs::remove_dir(folder).map_err(|e| {
            if e.kind() == io::ErrorKind::PermissionDenied {
                OrganizeError::DirectoryRemovalDenied {
                    path: folder.to_path_buf(),
                    source: e,
                }
            } else {
                OrganizeError::DirectoryRemovalFailed {
                    path: folder.to_path_buf(),
                    source: e,
                }
            }
        })
    }
}
