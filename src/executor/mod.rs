//! Executor module for file operations
//!
//! Every observable step is reported as an [`ExecutionEvent`]; the pass
//! coordinator turns those into log lines and report counters.

pub mod copy;
pub mod reaper;

use crate::diff::compare_files;
use crate::types::{slash_path, FileRecord, FileTree, SyncAction, SyncError, SyncState, WriteMode};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub use copy::copy_file;
pub use reaper::reap_orphans;

/// Events emitted while reconciling the replica.
#[derive(Debug)]
pub enum ExecutionEvent {
    /// A source file is about to be compared (relative path)
    Checking { path: PathBuf },
    /// Replica file created (relative path)
    Created { path: PathBuf, bytes: u64 },
    /// Replica file overwritten (relative path)
    Updated { path: PathBuf, bytes: u64 },
    /// Replica file already identical (relative path)
    Unchanged { path: PathBuf },
    /// Replica directory created (absolute path)
    DirectoryCreated { path: PathBuf },
    /// Replica file removed (relative path)
    FileDeleted { path: PathBuf },
    /// Replica directory removed (absolute path)
    DirectoryDeleted { path: PathBuf, was_empty: bool },
    /// A per-entry operation failed; the pass continues
    Error { error: SyncError },
}

impl ExecutionEvent {
    /// Log line for this event, if it produces one
    pub fn message(&self) -> Option<String> {
        let line = match self {
            ExecutionEvent::Checking { path } => format!("Checking: {}", slash_path(path)),
            ExecutionEvent::Created { path, .. } => format!("Created: {}", slash_path(path)),
            ExecutionEvent::Updated { path, .. } => format!("Updated: {}", slash_path(path)),
            ExecutionEvent::Unchanged { .. } => return None,
            ExecutionEvent::DirectoryCreated { path } => {
                format!("Created missing directory: {}", path.display())
            }
            ExecutionEvent::FileDeleted { path } => format!("Deleted: {}", slash_path(path)),
            ExecutionEvent::DirectoryDeleted { path, was_empty } => {
                if *was_empty {
                    format!("Deleted empty directory: {}", path.display())
                } else {
                    format!("Deleted directory: {}", path.display())
                }
            }
            ExecutionEvent::Error { error } => error.to_string(),
        };
        Some(line)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExecutionEvent::Error { .. })
    }
}

/// Receiver for execution events.
pub trait EventSink {
    fn emit(&mut self, event: ExecutionEvent);
}

impl EventSink for Vec<ExecutionEvent> {
    fn emit(&mut self, event: ExecutionEvent) {
        self.push(event);
    }
}

/// Create every source directory that is missing from the replica.
///
/// Directories are visited parents first. Each path is recorded in
/// `state` as preserved whether or not creation succeeds, so the reaper
/// never removes a directory the source still has.
pub fn sync_directories(
    source: &FileTree,
    replica_root: &Path,
    state: &mut SyncState,
    events: &mut dyn EventSink,
) {
    for rel_dir in source.dir_paths() {
        state.preserve_dir(rel_dir);
        if let Err(error) = ensure_dir_chain(replica_root, rel_dir, events) {
            events.emit(ExecutionEvent::Error { error });
        }
    }
}

/// Bring every source file up to date in the replica.
///
/// Continues on per-file failures. A file lands in the touched set only
/// when it was synchronized; failures go to the pending set and are
/// retried by the next pass.
pub fn sync_files(
    source: &FileTree,
    replica: &FileTree,
    replica_root: &Path,
    mode: WriteMode,
    state: &mut SyncState,
    events: &mut dyn EventSink,
) {
    for (rel_path, record) in source.iter() {
        events.emit(ExecutionEvent::Checking {
            path: rel_path.clone(),
        });

        match sync_file(record, replica, replica_root, mode, events) {
            Ok(outcome) => {
                state.touch(rel_path);
                events.emit(outcome);
            }
            Err(error) => {
                state.defer(rel_path);
                events.emit(ExecutionEvent::Error { error });
            }
        }
    }
}

/// Synchronize one source file and return the outcome event
fn sync_file(
    record: &FileRecord,
    replica: &FileTree,
    replica_root: &Path,
    mode: WriteMode,
    events: &mut dyn EventSink,
) -> Result<ExecutionEvent, SyncError> {
    let rel_path = &record.path;
    let dest = replica_root.join(rel_path);

    // Never write through a link: it is replaced by a regular file.
    let dest_is_link = fs::symlink_metadata(&dest)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if dest_is_link {
        fs::remove_file(&dest).map_err(|e| SyncError::delete(&dest, e))?;
        events.emit(ExecutionEvent::FileDeleted {
            path: rel_path.clone(),
        });
    }

    // The replica has a directory where the source has a file.
    if replica.contains_dir(rel_path) && dest.is_dir() {
        fs::remove_dir_all(&dest).map_err(|e| SyncError::delete(&dest, e))?;
        events.emit(ExecutionEvent::DirectoryDeleted {
            path: dest.clone(),
            was_empty: false,
        });
    }

    let replica_record = replica
        .get(rel_path)
        .filter(|_| !dest_is_link && dest.is_file());

    match compare_files(record, replica_record)? {
        SyncAction::Create => {
            if let Some(parent) = rel_path.parent() {
                ensure_dir_chain(replica_root, parent, events)?;
            }
            let bytes = copy_file(&record.abs_path, &dest, mode)
                .map_err(|e| SyncError::copy(rel_path, e))?;
            Ok(ExecutionEvent::Created {
                path: rel_path.clone(),
                bytes,
            })
        }
        SyncAction::Update => {
            let bytes = copy_file(&record.abs_path, &dest, mode)
                .map_err(|e| SyncError::copy(rel_path, e))?;
            Ok(ExecutionEvent::Updated {
                path: rel_path.clone(),
                bytes,
            })
        }
        SyncAction::Unchanged => Ok(ExecutionEvent::Unchanged {
            path: rel_path.clone(),
        }),
    }
}

/// Create `replica_root/rel_dir` one component at a time.
///
/// Each directory actually created emits `DirectoryCreated`. A file
/// occupying a path that must be a directory is removed first.
fn ensure_dir_chain(
    replica_root: &Path,
    rel_dir: &Path,
    events: &mut dyn EventSink,
) -> Result<(), SyncError> {
    let mut current = replica_root.to_path_buf();
    let mut rel_current = PathBuf::new();

    for component in rel_dir.components() {
        current.push(component);
        rel_current.push(component);

        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.is_dir() => continue,
            Ok(_) => {
                fs::remove_file(&current).map_err(|e| SyncError::delete(&current, e))?;
                events.emit(ExecutionEvent::FileDeleted {
                    path: rel_current.clone(),
                });
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(SyncError::directory_create(&current, e)),
        }

        match fs::create_dir(&current) {
            Ok(()) => events.emit(ExecutionEvent::DirectoryCreated {
                path: current.clone(),
            }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && current.is_dir() => {}
            Err(e) => return Err(SyncError::directory_create(&current, e)),
        }
    }

    Ok(())
}
