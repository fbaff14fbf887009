//! SyncAction - Verdicts of the change detector

/// Sync action determined by the change detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Exists in source, missing in replica
    Create,

    /// Exists in both, content differs
    Update,

    /// Exists in both, content identical
    Unchanged,
}

impl SyncAction {
    /// Whether the action copies bytes
    pub fn needs_copy(&self) -> bool {
        !matches!(self, SyncAction::Unchanged)
    }
}

/// How replica files are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate and overwrite the replica file directly
    #[default]
    InPlace,

    /// Write a hidden `.part` sibling, fsync, then rename into place
    Staged,
}
