//! Orphan plan generation

use crate::types::{FileTree, SyncState};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Replica entries with no counterpart in the source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrphanPlan {
    /// Orphan file and link relative paths, in path order
    pub files: Vec<PathBuf>,

    /// Orphan directory relative paths, deepest first
    pub dirs: Vec<PathBuf>,
}

impl OrphanPlan {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len() + self.dirs.len()
    }
}

/// Work out which replica entries the reaper must remove
///
/// A replica file is an orphan when the executor neither synchronized it
/// nor deferred it after a failure this pass. Replica links that are
/// dangling or point at a directory are never synchronized, so they are
/// always orphans and go with the files. A replica directory is an
/// orphan when its relative path is not a source directory. Directories
/// are ordered deepest first, so each is empty (or already gone) by the
/// time its own turn comes.
///
/// # Example
/// ```
/// use lilsync::diff::plan_orphans;
/// use lilsync::types::{FileTree, SyncState};
/// use std::path::PathBuf;
///
/// let source = FileTree::new(PathBuf::from("src"));
/// let mut replica = FileTree::new(PathBuf::from("dst"));
/// replica.insert_dir(PathBuf::from("a"));
/// replica.insert_dir(PathBuf::from("a/b"));
///
/// let plan = plan_orphans(&replica, &source, &SyncState::new());
/// assert_eq!(plan.dirs, vec![PathBuf::from("a/b"), PathBuf::from("a")]);
/// ```
pub fn plan_orphans(replica: &FileTree, source: &FileTree, state: &SyncState) -> OrphanPlan {
    let files: BTreeSet<PathBuf> = replica
        .paths()
        .chain(replica.other_link_paths())
        .filter(|path| !state.is_claimed(path))
        .cloned()
        .collect();

    let mut dirs: Vec<PathBuf> = replica
        .dir_paths()
        .filter(|path| !source.contains_dir(path) && !state.is_preserved_dir(path))
        .cloned()
        .collect();
    dirs.sort_by(|a, b| deepest_first(a, b));

    OrphanPlan {
        files: files.into_iter().collect(),
        dirs,
    }
}

fn deepest_first(a: &Path, b: &Path) -> Ordering {
    let depth_a = a.components().count();
    let depth_b = b.components().count();
    depth_b
        .cmp(&depth_a)
        .then_with(|| b.as_os_str().len().cmp(&a.as_os_str().len()))
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;
    use std::time::UNIX_EPOCH;

    fn tree_with(root: &str, files: &[&str], dirs: &[&str]) -> FileTree {
        let mut tree = FileTree::new(PathBuf::from(root));
        for f in files {
            tree.insert(
                PathBuf::from(f),
                FileRecord::new(PathBuf::from(f), PathBuf::from(root).join(f), 1, UNIX_EPOCH),
            );
        }
        for d in dirs {
            tree.insert_dir(PathBuf::from(d));
        }
        tree
    }

    #[test]
    fn test_touched_files_are_not_orphans() {
        let source = tree_with("/src", &["keep.txt"], &[]);
        let replica = tree_with("/dst", &["keep.txt", "stale.txt"], &[]);
        let mut state = SyncState::new();
        state.touch(Path::new("keep.txt"));

        let plan = plan_orphans(&replica, &source, &state);
        assert_eq!(plan.files, vec![PathBuf::from("stale.txt")]);
        assert!(plan.dirs.is_empty());
    }

    #[test]
    fn test_pending_files_are_protected() {
        let source = tree_with("/src", &["locked.db"], &[]);
        let replica = tree_with("/dst", &["locked.db"], &[]);
        let mut state = SyncState::new();
        state.defer(Path::new("locked.db"));

        let plan = plan_orphans(&replica, &source, &state);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_source_directories_are_kept_even_when_empty() {
        let source = tree_with("/src", &[], &["NestedFolder"]);
        let replica = tree_with("/dst", &[], &["NestedFolder", "NestedFolder/OrphanedFolder"]);

        let plan = plan_orphans(&replica, &source, &SyncState::new());
        assert_eq!(plan.dirs, vec![PathBuf::from("NestedFolder/OrphanedFolder")]);
    }

    #[test]
    fn test_directories_sorted_deepest_first() {
        let source = tree_with("/src", &[], &[]);
        let replica = tree_with(
            "/dst",
            &[],
            &["a", "a/b", "a/b/c", "zz", "a/longer-name"],
        );

        let plan = plan_orphans(&replica, &source, &SyncState::new());
        assert_eq!(plan.dirs[0], PathBuf::from("a/b/c"));
        assert_eq!(plan.dirs[1], PathBuf::from("a/longer-name"));
        assert_eq!(plan.dirs[2], PathBuf::from("a/b"));
        assert_eq!(plan.len(), 5);

        let a = plan.dirs.iter().position(|p| p == Path::new("a")).unwrap();
        let ab = plan.dirs.iter().position(|p| p == Path::new("a/b")).unwrap();
        assert!(ab < a);
    }

    #[test]
    fn test_non_file_links_are_orphans() {
        let source = tree_with("/src", &["a.txt"], &[]);
        let mut replica = tree_with("/dst", &["a.txt"], &[]);
        replica.insert_link(PathBuf::from("stale"));
        replica.insert_link(PathBuf::from("linkdir"));
        let mut state = SyncState::new();
        state.touch(Path::new("a.txt"));

        let plan = plan_orphans(&replica, &source, &state);
        assert_eq!(
            plan.files,
            vec![PathBuf::from("linkdir"), PathBuf::from("stale")]
        );
        assert!(plan.dirs.is_empty());
    }

    #[test]
    fn test_files_inside_orphan_dirs_are_listed() {
        let source = tree_with("/src", &[], &[]);
        let replica = tree_with("/dst", &["old/inner.txt"], &["old"]);

        let plan = plan_orphans(&replica, &source, &SyncState::new());
        assert_eq!(plan.files, vec![PathBuf::from("old/inner.txt")]);
        assert_eq!(plan.dirs, vec![PathBuf::from("old")]);
    }
}
