//! # lilsync - periodic one-way folder mirror
//!
//! Every pass makes the replica folder identical to the source folder:
//! new and changed files are copied, files and folders that no longer
//! exist in the source are deleted, and each action is appended to a
//! timestamped log.

// Module declarations
pub mod config;
pub mod scanner;
pub mod diff;
pub mod executor;
pub mod hash;
pub mod logging;
pub mod ui;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use types::{FileRecord, FileTree, SyncAction, SyncError, SyncReport, WriteMode};
pub use config::Config;
pub use logging::{FileLogger, LogSink, MemoryLogger};
pub use commands::sync::{synchronize, synchronize_with};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
