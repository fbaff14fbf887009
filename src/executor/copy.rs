//! File copy implementation

use crate::types::WriteMode;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Copy `src` over `dest`, returning the number of bytes written
///
/// The parent directory of `dest` must already exist. The source mtime is
/// carried over to the replica; permissions are not.
///
/// * `WriteMode::InPlace` truncates and rewrites `dest` directly. A crash
///   mid-write leaves a truncated replica until the next pass sees the
///   checksum mismatch and repairs it.
/// * `WriteMode::Staged` writes a hidden `.part` sibling, syncs it to disk
///   and renames it over `dest`, so readers see the old or the new content
///   and nothing in between.
///
/// # Example
/// ```no_run
/// use lilsync::executor::copy_file;
/// use lilsync::types::WriteMode;
/// use std::path::Path;
///
/// let bytes = copy_file(Path::new("source.txt"), Path::new("dest.txt"), WriteMode::Staged)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn copy_file(src: &Path, dest: &Path, mode: WriteMode) -> io::Result<u64> {
    match mode {
        WriteMode::InPlace => copy_in_place(src, dest),
        WriteMode::Staged => copy_staged(src, dest),
    }
}

/// Temporary path used by staged writes for `dest`
pub fn part_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.lilsync-part", name))
}

fn copy_in_place(src: &Path, dest: &Path) -> io::Result<u64> {
    let mut src_file = File::open(src)?;
    let mut dest_file = File::create(dest)?;

    let total_bytes = stream(&mut src_file, &mut dest_file)?;
    dest_file.flush()?;
    drop(dest_file);

    preserve_mtime(src, dest)?;
    Ok(total_bytes)
}

fn copy_staged(src: &Path, dest: &Path) -> io::Result<u64> {
    let part = part_path(dest);

    let result = (|| -> io::Result<u64> {
        let mut src_file = File::open(src)?;
        let mut part_file = File::create(&part)?;

        let total_bytes = stream(&mut src_file, &mut part_file)?;
        part_file.sync_all()?;

        // Drop the handle before rename (required on Windows)
        drop(part_file);

        preserve_mtime(src, &part)?;
        fs::rename(&part, dest)?;
        Ok(total_bytes)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&part);
    }
    result
}

fn stream(reader: &mut impl Read, writer: &mut impl Write) -> io::Result<u64> {
    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer[0..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    Ok(total_bytes)
}

fn preserve_mtime(src: &Path, dest: &Path) -> io::Result<()> {
    let mtime = fs::metadata(src)?.modified()?;
    filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime))
}
