//! SyncState - Bookkeeping for a single pass

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Relative paths the executor handled during one pass.
///
/// Owned by the pass coordinator and dropped when the pass ends.
#[derive(Debug, Default, Clone)]
pub struct SyncState {
    /// Files synchronized successfully (created, updated or already identical)
    touched: HashSet<PathBuf>,

    /// Source files whose sync failed; kept out of the reaper's reach
    pending: HashSet<PathBuf>,

    /// Directories present in source
    preserved_dirs: HashSet<PathBuf>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self, path: &Path) {
        self.pending.remove(path);
        self.touched.insert(path.to_path_buf());
    }

    pub fn defer(&mut self, path: &Path) {
        if !self.touched.contains(path) {
            self.pending.insert(path.to_path_buf());
        }
    }

    pub fn preserve_dir(&mut self, path: &Path) {
        self.preserved_dirs.insert(path.to_path_buf());
    }

    pub fn is_touched(&self, path: &Path) -> bool {
        self.touched.contains(path)
    }

    pub fn is_pending(&self, path: &Path) -> bool {
        self.pending.contains(path)
    }

    /// A replica file with this relative path belongs to the source
    pub fn is_claimed(&self, path: &Path) -> bool {
        self.is_touched(path) || self.is_pending(path)
    }

    pub fn is_preserved_dir(&self, path: &Path) -> bool {
        self.preserved_dirs.contains(path)
    }

    pub fn touched_count(&self) -> usize {
        self.touched.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
