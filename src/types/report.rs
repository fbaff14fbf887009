//! SyncReport - Outcome of one pass

use crate::executor::ExecutionEvent;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counts and log lines produced by a single pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Files copied into the replica for the first time
    pub created: usize,

    /// Replica files overwritten with new content
    pub updated: usize,

    /// Files already identical
    pub unchanged: usize,

    /// Replica directories created (including missing parents)
    pub created_dirs: usize,

    /// Orphan or blocking files removed from the replica
    pub deleted_files: usize,

    /// Orphan or blocking directories removed from the replica
    pub deleted_dirs: usize,

    /// Per-entry failures logged during the pass
    pub errors: usize,

    /// Bytes written by create/update
    pub bytes_copied: u64,

    /// Wall time of the pass
    pub duration: Duration,

    /// Log lines in the order they were produced
    pub lines: Vec<String>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update counters for an event and keep its log line.
    ///
    /// Returns the line so the caller can forward it to a log sink.
    pub fn record(&mut self, event: &ExecutionEvent) -> Option<String> {
        match event {
            ExecutionEvent::Checking { .. } => {}
            ExecutionEvent::Created { bytes, .. } => {
                self.created += 1;
                self.bytes_copied += bytes;
            }
            ExecutionEvent::Updated { bytes, .. } => {
                self.updated += 1;
                self.bytes_copied += bytes;
            }
            ExecutionEvent::Unchanged { .. } => self.unchanged += 1,
            ExecutionEvent::DirectoryCreated { .. } => self.created_dirs += 1,
            ExecutionEvent::FileDeleted { .. } => self.deleted_files += 1,
            ExecutionEvent::DirectoryDeleted { .. } => self.deleted_dirs += 1,
            ExecutionEvent::Error { .. } => self.errors += 1,
        }

        let line = event.message()?;
        self.lines.push(line.clone());
        Some(line)
    }

    /// Files plus directories removed
    pub fn total_deletions(&self) -> usize {
        self.deleted_files + self.deleted_dirs
    }

    /// Files whose bytes were written this pass
    pub fn total_copies(&self) -> usize {
        self.created + self.updated
    }

    /// True when the pass changed nothing on disk
    pub fn is_noop(&self) -> bool {
        self.total_copies() == 0 && self.total_deletions() == 0 && self.created_dirs == 0
    }

    /// True when no per-entry error was logged
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SyncError;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_record_counts_and_lines() {
        let mut report = SyncReport::new();

        report.record(&ExecutionEvent::Checking {
            path: PathBuf::from("a.txt"),
        });
        report.record(&ExecutionEvent::Created {
            path: PathBuf::from("a.txt"),
            bytes: 5,
        });
        report.record(&ExecutionEvent::Unchanged {
            path: PathBuf::from("b.txt"),
        });
        report.record(&ExecutionEvent::FileDeleted {
            path: PathBuf::from("old.txt"),
        });

        assert_eq!(report.created, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.deleted_files, 1);
        assert_eq!(report.bytes_copied, 5);
        assert_eq!(
            report.lines,
            vec!["Checking: a.txt", "Created: a.txt", "Deleted: old.txt"]
        );
        assert!(!report.is_noop());
    }

    #[test]
    fn test_record_error_counts_and_returns_line() {
        let mut report = SyncReport::new();
        let line = report.record(&ExecutionEvent::Error {
            error: SyncError::Copy {
                path: PathBuf::from("x.bin"),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            },
        });

        assert_eq!(line.as_deref(), Some("Error copying x.bin: disk full"));
        assert_eq!(report.errors, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_empty_report_is_noop() {
        let report = SyncReport::new();
        assert!(report.is_noop());
        assert!(report.is_clean());
        assert_eq!(report.total_deletions(), 0);
    }

    #[test]
    fn test_report_serializes() {
        let mut report = SyncReport::new();
        report.record(&ExecutionEvent::DirectoryDeleted {
            path: PathBuf::from("/replica/gone"),
            was_empty: true,
        });

        let json = serde_json::to_string(&report).expect("serialize report");
        let back: SyncReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(back, report);
    }
}
