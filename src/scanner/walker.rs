//! Sequential directory walker

use crate::types::{FileRecord, FileTree, SyncError};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::time::Instant;

/// Scan a directory and build a FileTree
///
/// Walks the tree recursively and records every regular file and every
/// directory below `root_path`. All of the `ignore` crate's filters are
/// turned off: hidden files, `.gitignore` and friends are mirrored like
/// anything else.
///
/// # Errors
/// * `SyncError::Scan` if `root_path` is missing or not a directory
/// * `SyncError::Scan` for the first entry that cannot be read mid-walk
///   (permission denied, I/O failure); a partial tree is never returned.
///   Files that vanish during the scan are skipped.
pub fn scan_directory(root_path: &Path) -> Result<FileTree, SyncError> {
    let start_time = Instant::now();

    let root_meta = fs::metadata(root_path).map_err(|e| SyncError::scan(root_path, e))?;
    if !root_meta.is_dir() {
        return Err(SyncError::scan(
            root_path,
            io::Error::new(ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let mut tree = FileTree::new(root_path.to_path_buf());

    let walker = ignore::WalkBuilder::new(root_path)
        .standard_filters(false)
        .follow_links(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => return Err(walk_error(root_path, &e)),
        };

        if entry.depth() == 0 {
            continue;
        }

        let Some(file_type) = entry.file_type() else {
            continue;
        };

        let relative_path = match entry.path().strip_prefix(root_path) {
            Ok(p) => p.to_path_buf(),
            Err(_) => {
                tracing::warn!(
                    "cannot compute relative path for {}; skipping",
                    entry.path().display()
                );
                continue;
            }
        };

        if file_type.is_dir() {
            tree.insert_dir(relative_path);
            continue;
        }

        // Links are not traversed but always recorded, so the replica side
        // can remove them. One that resolves to a regular file is also
        // recorded as that file.
        let metadata = if file_type.is_symlink() {
            tree.insert_link(relative_path.clone());
            match fs::metadata(entry.path()) {
                Ok(m) if m.is_file() => m,
                Ok(_) => {
                    tracing::debug!("non-file link {}", entry.path().display());
                    continue;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!("dangling link {}", entry.path().display());
                    continue;
                }
                Err(e) => return Err(SyncError::scan(entry.path(), e)),
            }
        } else if file_type.is_file() {
            match entry.metadata() {
                Ok(m) => m,
                Err(e) if error_kind(&e) == Some(ErrorKind::NotFound) => {
                    tracing::debug!("{} vanished during the scan", entry.path().display());
                    continue;
                }
                Err(e) => return Err(walk_error(entry.path(), &e)),
            }
        } else {
            // pipes, sockets, devices
            continue;
        };

        let mtime = metadata
            .modified()
            .map_err(|e| SyncError::scan(entry.path(), e))?;

        let record = FileRecord::new(
            relative_path.clone(),
            entry.path().to_path_buf(),
            metadata.len(),
            mtime,
        );
        tree.insert(relative_path, record);
    }

    tree.set_scan_duration(start_time.elapsed());
    tracing::debug!(
        root = %root_path.display(),
        files = tree.total_files,
        dirs = tree.total_dirs(),
        "scan complete"
    );

    Ok(tree)
}

/// Turn a walker failure into a `Scan` error naming the offending path
fn walk_error(fallback: &Path, err: &ignore::Error) -> SyncError {
    let path = error_path(err).unwrap_or(fallback);
    let source = match err.io_error() {
        Some(io_err) => io::Error::new(io_err.kind(), io_err.to_string()),
        None => io::Error::new(ErrorKind::Other, err.to_string()),
    };
    SyncError::scan(path, source)
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child),
        _ => None,
    }
}

fn error_kind(err: &ignore::Error) -> Option<ErrorKind> {
    err.io_error().map(|e| e.kind())
}

/// Scan a directory, treating a missing root as an empty tree
///
/// Used for the replica side, which may not exist before the first pass.
pub fn scan_or_empty(root_path: &Path) -> Result<FileTree, SyncError> {
    match scan_directory(root_path) {
        Err(SyncError::Scan { source, .. }) if source.kind() == ErrorKind::NotFound => {
            Ok(FileTree::new(root_path.to_path_buf()))
        }
        other => other,
    }
}
