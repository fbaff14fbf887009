//! One-shot maintenance: empty the replica and remove the log directory

use crate::config::absolute;
use crate::types::SyncError;
use crate::Config;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What cleanup removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Top-level replica entries deleted (each may be a whole subtree)
    pub removed_entries: usize,

    /// Log directory removed, when it was safe to remove it
    pub removed_log_dir: Option<PathBuf>,

    /// Log file removed
    pub removed_log_file: bool,
}

/// Delete the replica's contents and the log directory.
///
/// The replica root itself is kept. The log directory is removed only when
/// it is neither the working directory nor an ancestor of the source or the
/// replica; otherwise only the log file goes. Stops at the first failure.
pub fn run(config: &Config) -> Result<CleanupReport, SyncError> {
    let mut report = CleanupReport::default();

    if config.replica.is_dir() {
        let entries =
            fs::read_dir(&config.replica).map_err(|e| SyncError::scan(&config.replica, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SyncError::scan(&config.replica, e))?;
            let path = entry.path();
            let is_dir = entry
                .file_type()
                .map(|t| t.is_dir())
                .map_err(|e| SyncError::delete(&path, e))?;
            let result = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            result.map_err(|e| SyncError::delete(&path, e))?;
            tracing::info!("removed {}", path.display());
            report.removed_entries += 1;
        }
    }

    match removable_log_dir(config)? {
        Some(dir) => {
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(|e| SyncError::delete(&dir, e))?;
                report.removed_log_file = true;
                report.removed_log_dir = Some(dir);
            }
        }
        None => match fs::remove_file(&config.log_file) {
            Ok(()) => report.removed_log_file = true,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(SyncError::delete(&config.log_file, e)),
        },
    }

    Ok(report)
}

/// The log file's directory, if deleting it cannot take anything else along
fn removable_log_dir(config: &Config) -> Result<Option<PathBuf>, SyncError> {
    let log_file = absolute(&config.log_file)?;
    let Some(dir) = log_file.parent() else {
        return Ok(None);
    };
    if dir.parent().is_none() {
        return Ok(None);
    }

    let cwd = std::env::current_dir().map_err(SyncError::Io)?;
    let protected = [cwd, absolute(&config.source)?, absolute(&config.replica)?];
    if protected.iter().any(|p| contains(dir, p)) {
        tracing::debug!(
            "keeping log directory {}: it holds the working directory, source or replica",
            dir.display()
        );
        return Ok(None);
    }

    Ok(Some(dir.to_path_buf()))
}

/// `outer` is `inner` or one of its ancestors
fn contains(outer: &Path, inner: &Path) -> bool {
    inner.starts_with(outer)
}
