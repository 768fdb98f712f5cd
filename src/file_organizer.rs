//! Single-file moves and the error type shared by the whole crate.
//!
//! This module knows how to move one file into a destination folder: it
//! creates the folder when missing, picks a free name through the conflict
//! resolver, and performs the rename. Walking the tree and choosing folders
//! is left to [`crate::organizer`].

use crate::conflict::resolve_conflict;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file move that was (or would be) performed.
///
/// Only lives for the processing of a single file; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOperation {
    /// Where the file was before the move.
    pub source_path: PathBuf,
    /// Where the file ends up, after conflict resolution.
    pub destination_path: PathBuf,
}

/// Errors that can occur while reorganizing a folder.
#[derive(Debug)]
pub enum OrganizeError {
    /// The folder to organize is missing or is not a directory.
    InvalidFolder { path: PathBuf },
    /// The requested strategy is not one of the known ones.
    InvalidStrategy { label: String },
    /// Failed to create a destination folder.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// The move was refused (permission denied) or the destination appeared
    /// between the conflict check and the move. The file is skipped.
    MoveConflict {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Any other failure while moving a file.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Permission denied while removing an empty folder. The folder stays.
    DirectoryRemovalDenied { path: PathBuf, source: io::Error },
    /// Any other failure while checking or removing an empty folder.
    DirectoryRemovalFailed { path: PathBuf, source: io::Error },
    /// The directory tree could not be read.
    TraversalFailed { path: PathBuf, source: io::Error },
}

impl OrganizeError {
    /// Returns true for failures that only affect one file or folder, after
    /// which the run carries on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MoveConflict { .. } | Self::DirectoryRemovalDenied { .. }
        )
    }
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFolder { path } => {
                write!(f, "Invalid folder {}: not an existing directory", path.display())
            }
            Self::InvalidStrategy { label } => {
                write!(f, "Invalid organize method '{}'", label)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveConflict {
                source,
                destination,
                source_error,
            }
            | Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::DirectoryRemovalDenied { path, source }
            | Self::DirectoryRemovalFailed { path, source } => {
                write!(f, "Failed to remove folder {}: {}", path.display(), source)
            }
            Self::TraversalFailed { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidFolder { .. } | Self::InvalidStrategy { .. } => None,
            Self::DirectoryCreationFailed { source, .. }
            | Self::DirectoryRemovalDenied { source, .. }
            | Self::DirectoryRemovalFailed { source, .. }
            | Self::TraversalFailed { source, .. } => Some(source),
            Self::MoveConflict { source_error, .. } | Self::FileMoveFailure { source_error, .. } => {
                Some(source_error)
            }
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves individual files into destination folders.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Works out where `file_path` would land inside `destination_folder`.
    ///
    /// If a file with the same name is already there, the conflict resolver
    /// picks a free `"<name> (<n>)<ext>"` variant. Nothing is created or moved.
    pub fn plan_move(file_path: &Path, destination_folder: &Path) -> OrganizeResult<MoveOperation> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                source: file_path.to_path_buf(),
                destination: destination_folder.to_path_buf(),
                source_error: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let mut destination_path = destination_folder.join(file_name);
        if destination_path.exists() {
            destination_path = resolve_conflict(&destination_path);
        }

        Ok(MoveOperation {
            source_path: file_path.to_path_buf(),
            destination_path,
        })
    }

    /// Moves a file into `destination_folder` and returns what was done.
    ///
    /// The destination folder is created when missing (one level only; its
    /// parent must exist). Name collisions are resolved before moving.
    ///
    /// # Errors
    ///
    /// * [`OrganizeError::DirectoryCreationFailed`] if the folder cannot be made
    /// * [`OrganizeError::MoveConflict`] on permission denied, or when the
    ///   resolved destination got taken right before the move
    /// * [`OrganizeError::FileMoveFailure`] for any other I/O error
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use reorg::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let op = FileOrganizer::move_into(
    ///     Path::new("/data/notes.txt"),
    ///     Path::new("/data/txt"),
    /// );
    ///
    /// match op {
    ///     Ok(op) => println!("Moved to {}", op.destination_path.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_into(file_path: &Path, destination_folder: &Path) -> OrganizeResult<MoveOperation> {
        Self::ensure_folder(destination_folder)?;

        let operation = Self::plan_move(file_path, destination_folder)?;
        Self::perform(&operation)?;

        Ok(operation)
    }

    /// Creates `folder` if it doesn't exist yet.
    pub fn ensure_folder(folder: &Path) -> OrganizeResult<()> {
        if folder.is_dir() {
            return Ok(());
        }

        match fs::create_dir(folder) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && folder.is_dir() => Ok(()),
            Err(e) => Err(OrganizeError::DirectoryCreationFailed {
                path: folder.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Renames the file described by `operation`, refusing to overwrite.
    fn perform(operation: &MoveOperation) -> OrganizeResult<()> {
        let MoveOperation {
            source_path,
            destination_path,
        } = operation;

        // rename(2) replaces existing files silently.
        if destination_path.exists() {
            return Err(OrganizeError::MoveConflict {
                source: source_path.clone(),
                destination: destination_path.clone(),
                source_error: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "destination already exists",
                ),
            });
        }

        fs::rename(source_path, destination_path).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::AlreadyExists => {
                OrganizeError::MoveConflict {
                    source: source_path.clone(),
                    destination: destination_path.clone(),
                    source_error: e,
                }
            }
            _ => OrganizeError::FileMoveFailure {
                source: source_path.clone(),
                destination: destination_path.clone(),
                source_error: e,
            },
        })
    }
}
