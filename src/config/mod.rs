//! Configuration management

use crate::types::{SyncError, WriteMode};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "lilsync", version, about = "Periodic one-way folder mirror")]
pub struct Cli {
    /// Folder to mirror from
    pub source: PathBuf,

    /// Folder kept identical to SOURCE
    pub replica: PathBuf,

    /// File that receives one line per action, appended across runs
    pub log_file: PathBuf,

    /// Seconds between passes
    pub interval: u64,

    /// Delete the replica's contents and the log directory, then exit
    #[arg(long, conflicts_with = "once")]
    pub cleanup: bool,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Write replica files to a temporary sibling and rename them into place
    #[arg(long)]
    pub staged_writes: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Replica directory
    pub replica: PathBuf,

    /// Log file path
    pub log_file: PathBuf,

    /// Time between pass starts
    pub interval: Duration,

    /// Run the cleanup command instead of syncing
    pub cleanup: bool,

    /// Single pass, no scheduler
    pub once: bool,

    /// How replica files are written
    pub write_mode: WriteMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            replica: PathBuf::new(),
            log_file: PathBuf::from("lilsync.log"),
            interval: Duration::from_secs(60),
            cleanup: false,
            once: false,
            write_mode: WriteMode::default(),
        }
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.interval.is_zero() {
            return Err(SyncError::Startup(
                "Interval must be a positive number of seconds".to_string(),
            ));
        }

        if !self.source.exists() {
            return Err(SyncError::Startup(format!(
                "Source folder {} does not exist",
                self.source.display()
            )));
        }
        if !self.source.is_dir() {
            return Err(SyncError::Startup(format!(
                "Source {} is not a folder",
                self.source.display()
            )));
        }
        if self.replica.exists() && !self.replica.is_dir() {
            return Err(SyncError::Startup(format!(
                "Replica {} exists and is not a folder",
                self.replica.display()
            )));
        }

        let source = absolute(&self.source)?;
        let replica = absolute(&self.replica)?;
        if source == replica {
            return Err(SyncError::Startup(
                "Source and replica cannot be the same folder".to_string(),
            ));
        }
        if replica.starts_with(&source) || source.starts_with(&replica) {
            return Err(SyncError::Startup(format!(
                "Source {} and replica {} cannot be nested inside each other",
                self.source.display(),
                self.replica.display()
            )));
        }

        Ok(())
    }

    /// Whether the replica root still has to be created by the first pass
    pub fn replica_missing(&self) -> bool {
        !self.replica.exists()
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let config = Config {
            source: cli.source,
            replica: cli.replica,
            log_file: cli.log_file,
            interval: Duration::from_secs(cli.interval),
            cleanup: cli.cleanup,
            once: cli.once,
            write_mode: if cli.staged_writes {
                WriteMode::Staged
            } else {
                WriteMode::InPlace
            },
        };
        config.validate()?;
        Ok(config)
    }
}

/// Absolute form of `path` without touching the filesystem
pub(crate) fn absolute(path: &Path) -> Result<PathBuf, SyncError> {
    std::path::absolute(path).map_err(|e| {
        SyncError::Startup(format!("Cannot resolve path {}: {}", path.display(), e))
    })
}
