//! Sync log sinks and diagnostic tracing
//!
//! The sync log is the audit trail of every pass: one UTC-timestamped line
//! per event, appended and flushed before `log` returns. Diagnostics that
//! are not part of that trail go through `tracing`.

use crate::types::SyncError;
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `yyyy-MM-dd HH:mm:ss`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destination for sync log lines.
///
/// Implementations must be safe to call from several threads at once.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn log(&self, message: &str) {
        (**self).log(message)
    }
}

/// Render a log line as written to disk
pub fn format_line(at: DateTime<Utc>, message: &str) -> String {
    format!("{} - {}", at.format(TIMESTAMP_FORMAT), message)
}

/// Append-only log file.
///
/// Each call opens the file, appends one line, flushes and closes it, all
/// under a mutex, so a crash mid-pass leaves a truthful partial log.
#[derive(Debug)]
pub struct FileLogger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLogger {
    /// Open (creating if needed) the log file at `path`.
    ///
    /// A missing parent directory is created. A new file starts with a
    /// `Log started at ...` header; an existing one is appended to.
    pub fn open(path: &Path) -> Result<Self, SyncError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SyncError::directory_create(parent, e))?;
        }

        if !path.exists() {
            let header = format!("Log started at {}", Utc::now().format(TIMESTAMP_FORMAT));
            append_line(path, &header)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLogger {
    fn log(&self, message: &str) {
        let line = format_line(Utc::now(), message);
        tracing::info!(target: "lilsync::sync", "{}", message);

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = append_line(&self.path, &line) {
            tracing::error!("failed to append to {}: {}", self.path.display(), e);
        }
    }
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.flush()
}

/// In-memory sink, mostly for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages logged so far, without timestamps
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for MemoryLogger {
    fn log(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Install the console subscriber.
///
/// Level comes from `RUST_LOG`, defaulting to `info`, which echoes every
/// sync log line to the console.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer().with_target(false).compact();
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
