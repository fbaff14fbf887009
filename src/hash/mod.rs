//! Hashing utilities

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Compute the Blake3 hash of a file
///
/// The file is streamed in 64KB chunks, so memory use does not grow with
/// file size. The caller decides which error variant a failure becomes.
///
/// # Example
/// ```no_run
/// use lilsync::hash::compute_hash;
/// use std::path::Path;
///
/// let hash = compute_hash(Path::new("file.txt"))?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn compute_hash(file_path: &Path) -> io::Result<[u8; 32]> {
    let mut file = File::open(file_path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let bytes_read = file.read(&mut buffer)?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[0..bytes_read]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Lowercase hex rendering of a digest
pub fn to_hex(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}
