//! Pass coordinator
//!
//! One pass = scan source, scan replica, mirror directories, mirror files,
//! rescan the replica, reap orphans. Nothing is remembered between passes;
//! every pass recomputes the diff from scratch, so partial failures heal on
//! the next run.

use crate::diff::plan_orphans;
use crate::executor::{reap_orphans, sync_directories, sync_files, EventSink, ExecutionEvent};
use crate::logging::LogSink;
use crate::scanner::{scan_directory, scan_or_empty};
use crate::types::{SyncError, SyncReport, SyncState, WriteMode};
use crate::ui;
use crate::Config;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Run one pass for `config`, logging an abort and printing the summary
pub fn run(config: &Config, log: &dyn LogSink) -> Result<SyncReport, SyncError> {
    match synchronize_with(&config.source, &config.replica, config.write_mode, log) {
        Ok(report) => {
            ui::print_pass_summary(&report);
            Ok(report)
        }
        Err(error) => {
            log.log(&format!("Pass aborted: {}", error));
            Err(error)
        }
    }
}

/// Mirror `source` onto `replica` once, writing replica files in place
///
/// # Example
/// ```no_run
/// use lilsync::commands::sync::synchronize;
/// use lilsync::logging::MemoryLogger;
/// use std::path::Path;
///
/// let log = MemoryLogger::new();
/// let report = synchronize(Path::new("src"), Path::new("replica"), &log)?;
/// println!("{} created, {} deleted", report.created, report.total_deletions());
/// # Ok::<(), lilsync::SyncError>(())
/// ```
pub fn synchronize(
    source: &Path,
    replica: &Path,
    log: &dyn LogSink,
) -> Result<SyncReport, SyncError> {
    synchronize_with(source, replica, WriteMode::default(), log)
}

/// Mirror `source` onto `replica` once
///
/// # Errors
/// * `SyncError::Scan` when the source root is missing or any entry of
///   either tree cannot be read; the pass is abandoned before any orphan
///   is reaped
/// * `SyncError::DirectoryCreate` when a missing replica root cannot be
///   created
///
/// Per-entry failures do not surface here; they are logged and counted in
/// `SyncReport::errors`.
pub fn synchronize_with(
    source: &Path,
    replica: &Path,
    mode: WriteMode,
    log: &dyn LogSink,
) -> Result<SyncReport, SyncError> {
    let started = Instant::now();
    let mut recorder = PassRecorder::new(log);

    let source_tree = scan_directory(source)?;

    if !replica.exists() {
        fs::create_dir_all(replica).map_err(|e| SyncError::directory_create(replica, e))?;
        recorder.emit(ExecutionEvent::DirectoryCreated {
            path: replica.to_path_buf(),
        });
    }
    let replica_tree = scan_or_empty(replica)?;

    let mut state = SyncState::new();
    sync_directories(&source_tree, replica, &mut state, &mut recorder);
    sync_files(
        &source_tree,
        &replica_tree,
        replica,
        mode,
        &mut state,
        &mut recorder,
    );

    let replica_after = scan_or_empty(replica)?;
    let plan = plan_orphans(&replica_after, &source_tree, &state);
    reap_orphans(replica, &plan, &mut recorder);

    let mut report = recorder.finish();
    report.duration = started.elapsed();
    tracing::debug!(
        touched = state.touched_count(),
        pending = state.pending_count(),
        orphans = plan.len(),
        "pass finished"
    );
    Ok(report)
}

/// Turns execution events into report counters and log lines
struct PassRecorder<'a> {
    sink: &'a dyn LogSink,
    report: SyncReport,
}

impl<'a> PassRecorder<'a> {
    fn new(sink: &'a dyn LogSink) -> Self {
        Self {
            sink,
            report: SyncReport::new(),
        }
    }

    fn finish(self) -> SyncReport {
        self.report
    }
}

impl EventSink for PassRecorder<'_> {
    fn emit(&mut self, event: ExecutionEvent) {
        if let ExecutionEvent::Error { error } = &event {
            tracing::debug!(
                path = ?error.path(),
                per_entry = error.is_per_entry(),
                "entry failed"
            );
        }
        if let Some(line) = self.report.record(&event) {
            self.sink.log(&line);
        }
    }
}

/// Coordinator state for one source/replica pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Idle,
    Running,
}

/// Single-flight guard: at most one pass runs at a time.
///
/// Clones share the same state. A trigger that finds a pass running is
/// dropped, not queued.
#[derive(Debug, Clone, Default)]
pub struct PassGate {
    running: Arc<AtomicBool>,
}

impl PassGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PassState {
        if self.running.load(Ordering::Acquire) {
            PassState::Running
        } else {
            PassState::Idle
        }
    }

    /// Move `Idle → Running`; `None` when a pass is already running
    pub fn try_enter(&self) -> Option<PassGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PassGuard {
                running: Arc::clone(&self.running),
            })
    }

    /// Run one pass unless another is in flight
    pub fn run(&self, config: &Config, log: &dyn LogSink) -> Option<Result<SyncReport, SyncError>> {
        let _guard = self.try_enter()?;
        Some(run(config, log))
    }
}

/// Held for the duration of a pass; dropping it returns the gate to `Idle`
#[derive(Debug)]
pub struct PassGuard {
    running: Arc<AtomicBool>,
}

impl Drop for PassGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;
    use tempfile::TempDir;

    #[test]
    fn test_gate_is_single_flight() {
        let gate = PassGate::new();
        assert_eq!(gate.state(), PassState::Idle);

        let guard = gate.try_enter().expect("first entry");
        assert_eq!(gate.state(), PassState::Running);
        assert!(gate.try_enter().is_none());
        assert!(gate.clone().try_enter().is_none(), "clones share state");

        drop(guard);
        assert_eq!(gate.state(), PassState::Idle);
        assert!(gate.try_enter().is_some());
    }

    #[test]
    fn test_gate_run_drops_overlapping_pass() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("a.txt"), b"a").expect("write a");

        let config = Config {
            source: src.path().to_path_buf(),
            replica: dst.path().to_path_buf(),
            ..Config::default()
        };
        let gate = PassGate::new();
        let log = MemoryLogger::new();

        let held = gate.try_enter().expect("hold gate");
        assert!(gate.run(&config, &log).is_none());
        assert!(!dst.path().join("a.txt").exists());

        drop(held);
        let report = gate.run(&config, &log).expect("gate free").expect("pass ok");
        assert_eq!(report.created, 1);
        assert_eq!(gate.state(), PassState::Idle);
    }

    #[test]
    fn test_run_logs_abort_for_missing_source() {
        let dir = TempDir::new().expect("create tempdir");
        let config = Config {
            source: dir.path().join("missing"),
            replica: dir.path().join("replica"),
            ..Config::default()
        };
        let log = MemoryLogger::new();

        let err = run(&config, &log).unwrap_err();
        assert!(err.is_fatal());
        assert!(!config.replica.exists(), "aborted pass must not create the replica");

        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Pass aborted: Error scanning"));
    }

    #[test]
    #[cfg(unix)]
    fn test_unreadable_source_subtree_aborts_before_reaping() {
        use std::os::unix::fs::PermissionsExt;

        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let secret = src.path().join("secret");
        fs::create_dir(&secret).expect("create secret");
        fs::write(secret.join("data.txt"), b"data").expect("write data");
        let config = Config {
            source: src.path().to_path_buf(),
            replica: dst.path().to_path_buf(),
            ..Config::default()
        };
        run(&config, &MemoryLogger::new()).expect("first pass");

        fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).expect("lock secret");
        if fs::read_dir(&secret).is_ok() {
            fs::set_permissions(&secret, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let log = MemoryLogger::new();
        let result = run(&config, &log);
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(SyncError::Scan { .. })));
        assert_eq!(fs::read(dst.path().join("secret/data.txt")).unwrap(), b"data");
        let lines = log.lines();
        assert_eq!(lines.len(), 1, "nothing is deleted or copied: {lines:?}");
        assert!(lines[0].starts_with(&format!(
            "Pass aborted: Error scanning {}: ",
            secret.display()
        )));
    }

    #[test]
    fn test_report_lines_match_sink() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("A.txt"), b"hello").expect("write A");
        fs::write(dst.path().join("stale.txt"), b"x").expect("write stale");

        let log = MemoryLogger::new();
        let report = synchronize(src.path(), dst.path(), &log).expect("pass ok");

        assert_eq!(report.lines, log.lines());
        assert_eq!(
            report.lines,
            vec!["Checking: A.txt", "Created: A.txt", "Deleted: stale.txt"]
        );
    }
}
