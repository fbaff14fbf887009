//! Error types for lilsync
//!
//! Per-entry variants render as the exact line written to the sync log, so
//! every caught failure produces one log line naming the path and the cause.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for lilsync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Bad arguments or a missing source root; nothing was synced
    #[error("Startup error: {0}")]
    Startup(String),

    /// A tree root could not be enumerated; aborts the current pass only
    #[error("Error scanning {}: {source}", path.display())]
    Scan { path: PathBuf, source: io::Error },

    /// File content could not be hashed
    #[error("Error computing checksum of {}: {source}", path.display())]
    Checksum { path: PathBuf, source: io::Error },

    /// Create or update of a replica file failed
    #[error("Error copying {}: {source}", path.display())]
    Copy { path: PathBuf, source: io::Error },

    /// Orphan removal failed
    #[error("Error deleting {}: {source}", path.display())]
    Delete { path: PathBuf, source: io::Error },

    /// A replica directory could not be created
    #[error("Error creating directory {}: {source}", path.display())]
    DirectoryCreate { path: PathBuf, source: io::Error },

    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl SyncError {
    /// Errors that abort before or during a pass rather than a single entry
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Startup(_) | SyncError::Scan { .. })
    }

    /// Errors scoped to one file or directory; the pass continues past them
    pub fn is_per_entry(&self) -> bool {
        matches!(
            self,
            SyncError::Checksum { .. }
                | SyncError::Copy { .. }
                | SyncError::Delete { .. }
                | SyncError::DirectoryCreate { .. }
        )
    }

    /// Offending path, when the error carries one
    pub fn path(&self) -> Option<&Path> {
        match self {
            SyncError::Scan { path, .. }
            | SyncError::Checksum { path, .. }
            | SyncError::Copy { path, .. }
            | SyncError::Delete { path, .. }
            | SyncError::DirectoryCreate { path, .. } => Some(path),
            SyncError::Startup(_) | SyncError::Io(_) => None,
        }
    }

    pub(crate) fn scan(path: &Path, source: io::Error) -> Self {
        SyncError::Scan {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn checksum(path: &Path, source: io::Error) -> Self {
        SyncError::Checksum {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn copy(path: &Path, source: io::Error) -> Self {
        SyncError::Copy {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn delete(path: &Path, source: io::Error) -> Self {
        SyncError::Delete {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn directory_create(path: &Path, source: io::Error) -> Self {
        SyncError::DirectoryCreate {
            path: path.to_path_buf(),
            source,
        }
    }
}
