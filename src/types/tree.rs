//! FileTree - Directory structure representation

use super::FileRecord;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File tree (directory structure)
///
/// Both maps are ordered by relative path, so iteration visits a parent
/// directory before anything beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTree {
    /// Map: relative_path → FileRecord
    pub entries: BTreeMap<PathBuf, FileRecord>,

    /// Relative paths of every directory below the root
    pub dirs: BTreeSet<PathBuf>,

    /// Relative paths of every symbolic link below the root. Links that
    /// resolve to a regular file are also in `entries`.
    pub links: BTreeSet<PathBuf>,

    /// Aggregate statistics
    pub total_size: u64,
    pub total_files: usize,

    /// Scan metadata
    pub scan_duration: Duration,
    pub root_path: PathBuf,
}

impl FileTree {
    /// Create a new empty FileTree
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            entries: BTreeMap::new(),
            dirs: BTreeSet::new(),
            links: BTreeSet::new(),
            total_size: 0,
            total_files: 0,
            scan_duration: Duration::from_secs(0),
            root_path,
        }
    }

    /// Insert a file record into the tree
    ///
    /// If the path already exists, the old record is replaced and statistics are adjusted.
    pub fn insert(&mut self, path: PathBuf, entry: FileRecord) {
        if let Some(old_entry) = self.entries.get(&path) {
            self.total_size = self.total_size.saturating_sub(old_entry.size);
            self.total_files = self.total_files.saturating_sub(1);
        }

        self.total_size += entry.size;
        self.total_files += 1;
        self.entries.insert(path, entry);
    }

    /// Record a directory relative path
    pub fn insert_dir(&mut self, path: PathBuf) {
        self.dirs.insert(path);
    }

    /// Record a symbolic link relative path
    pub fn insert_link(&mut self, path: PathBuf) {
        self.links.insert(path);
    }

    /// Check if a path is a symbolic link in the tree
    pub fn is_link(&self, path: &Path) -> bool {
        self.links.contains(path)
    }

    /// Get a file record by path
    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.entries.get(path)
    }

    /// Check if a file path exists in the tree
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Check if a directory path exists in the tree
    pub fn contains_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    /// Number of file records in the tree
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the tree holds no files, directories or links
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.dirs.is_empty() && self.links.is_empty()
    }

    /// Number of directories below the root
    pub fn total_dirs(&self) -> usize {
        self.dirs.len()
    }

    /// Iterator over all file records in path order
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &FileRecord)> {
        self.entries.iter()
    }

    /// Iterator over file paths in order
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    /// Iterator over directory paths, parents first
    pub fn dir_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.dirs.iter()
    }

    /// Links with no file record: dangling, or pointing at a directory
    pub fn other_link_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.links.iter().filter(|p| !self.entries.contains_key(*p))
    }

    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.scan_duration = duration;
    }
}
