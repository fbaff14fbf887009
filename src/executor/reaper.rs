//! Orphan removal
//!
//! Runs after every source file has been handled, against a fresh scan of
//! the replica, so the touched set is complete before anything is deleted.

use crate::diff::OrphanPlan;
use crate::executor::{EventSink, ExecutionEvent};
use crate::types::SyncError;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

/// Delete every entry of `plan` under `replica_root`.
///
/// Files go first, then directories in the plan's deepest-first order. An
/// empty directory is removed with `remove_dir`; one that still has
/// content has no source counterpart at all and is removed recursively.
/// Entries already gone are skipped. Failures are emitted as `Delete`
/// errors and never stop the sweep.
pub fn reap_orphans(replica_root: &Path, plan: &OrphanPlan, events: &mut dyn EventSink) {
    for rel_path in &plan.files {
        let abs_path = replica_root.join(rel_path);
        match fs::remove_file(&abs_path) {
            Ok(()) => events.emit(ExecutionEvent::FileDeleted {
                path: rel_path.clone(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("orphan {} already gone", abs_path.display());
            }
            Err(e) => events.emit(ExecutionEvent::Error {
                error: SyncError::delete(&abs_path, e),
            }),
        }
    }

    for rel_dir in &plan.dirs {
        let abs_dir = replica_root.join(rel_dir);
        match remove_orphan_dir(&abs_dir) {
            Ok(Some(was_empty)) => events.emit(ExecutionEvent::DirectoryDeleted {
                path: abs_dir,
                was_empty,
            }),
            Ok(None) => {}
            Err(e) => events.emit(ExecutionEvent::Error {
                error: SyncError::delete(&abs_dir, e),
            }),
        }
    }
}

/// Remove a directory; `Ok(None)` when it no longer exists
fn remove_orphan_dir(path: &Path) -> io::Result<Option<bool>> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if !meta.is_dir() {
        return Ok(None);
    }

    let was_empty = fs::read_dir(path)?.next().is_none();
    let result = if was_empty {
        fs::remove_dir(path)
    } else {
        fs::remove_dir_all(path)
    };

    match result {
        Ok(()) => Ok(Some(was_empty)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
