//! Core type definitions for lilsync

mod action;
mod entry;
mod error;
mod report;
mod state;
mod tree;

pub use action::{SyncAction, WriteMode};
pub use entry::{slash_path, FileRecord};
pub use error::SyncError;
pub use report::SyncReport;
pub use state::SyncState;
pub use tree::FileTree;
