//! FileRecord - Represents a single file in a scanned tree

use crate::hash::compute_hash;
use crate::types::SyncError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

/// Represents a file in the sync tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    /// Relative path from the tree root
    pub path: PathBuf,

    /// Absolute path on disk
    pub abs_path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Last modification time (UTC)
    pub mtime: SystemTime,

    /// Blake3 content hash (computed lazily, at most once)
    #[serde(skip)]
    checksum: OnceLock<[u8; 32]>,
}

impl FileRecord {
    /// Create a new FileRecord with the given parameters
    pub fn new(path: PathBuf, abs_path: PathBuf, size: u64, mtime: SystemTime) -> Self {
        Self {
            path,
            abs_path,
            size,
            mtime,
            checksum: OnceLock::new(),
        }
    }

    /// Seed the cached checksum
    pub fn with_checksum(self, checksum: [u8; 32]) -> Self {
        let _ = self.checksum.set(checksum);
        self
    }

    /// Content checksum, hashing the file on first use
    pub fn checksum(&self) -> Result<[u8; 32], SyncError> {
        if let Some(hash) = self.checksum.get() {
            return Ok(*hash);
        }
        let hash =
            compute_hash(&self.abs_path).map_err(|e| SyncError::checksum(&self.abs_path, e))?;
        let _ = self.checksum.set(hash);
        Ok(hash)
    }

    /// Check if the checksum has already been computed
    pub fn has_checksum(&self) -> bool {
        self.checksum.get().is_some()
    }

    /// Relative path with `/` separators, as written to the log
    pub fn display_path(&self) -> String {
        slash_path(&self.path)
    }
}

/// Render a relative path with `/` separators regardless of platform
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
