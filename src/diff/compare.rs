//! File comparison logic

use crate::hash::to_hex;
use crate::types::{FileRecord, SyncAction, SyncError};

/// Decide what a source file needs against its replica counterpart
///
/// 1. **No replica record**: `Create`
/// 2. **Size mismatch**: `Update`, without reading either file
/// 3. **Same size**: Blake3 of both files decides `Update` or `Unchanged`
///
/// Modification times are never trusted for equality. A file rewritten
/// with the same size and timestamp is still caught by the checksum.
///
/// # Errors
/// `SyncError::Checksum` when either file cannot be read. The caller skips
/// the file for this pass instead of assuming a copy is needed.
pub fn compare_files(
    src: &FileRecord,
    replica: Option<&FileRecord>,
) -> Result<SyncAction, SyncError> {
    let Some(replica) = replica else {
        return Ok(SyncAction::Create);
    };

    if src.size != replica.size {
        return Ok(SyncAction::Update);
    }

    let src_hash = src.checksum()?;
    let replica_hash = replica.checksum()?;

    if src_hash == replica_hash {
        Ok(SyncAction::Unchanged)
    } else {
        tracing::debug!(
            path = %src.display_path(),
            source = %to_hex(&src_hash),
            replica = %to_hex(&replica_hash),
            "checksum mismatch"
        );
        Ok(SyncAction::Update)
    }
}

/// Whether the replica needs a copy of `src`
pub fn needs_copy(src: &FileRecord, replica: Option<&FileRecord>) -> Result<bool, SyncError> {
    compare_files(src, replica).map(|action| action.needs_copy())
}
