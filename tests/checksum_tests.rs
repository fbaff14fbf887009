//! Content comparison tests
//!
//! Equality is decided by size and Blake3 digest; modification times never
//! decide it.

use lilsync::diff::{compare_files, needs_copy};
use lilsync::hash::{compute_hash, to_hex};
use lilsync::{FileRecord, SyncAction, SyncError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

fn create_temp_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn record_for(abs_path: &Path, rel: &str, mtime: SystemTime) -> FileRecord {
    let size = fs::metadata(abs_path).expect("stat test file").len();
    FileRecord::new(PathBuf::from(rel), abs_path.to_path_buf(), size, mtime)
}

#[test]
fn test_compute_hash_deterministic() {
    let temp_dir = tempfile::tempdir().unwrap();
    let file1 = create_temp_file(&temp_dir, "file1.txt", b"Same content");
    let file2 = create_temp_file(&temp_dir, "file2.txt", b"Same content");

    let hash1 = compute_hash(&file1).expect("Failed to compute hash1");
    let hash2 = compute_hash(&file2).expect("Failed to compute hash2");

    assert_eq!(hash1, hash2);
    assert_eq!(to_hex(&hash1).len(), 64);
}

#[test]
fn test_compute_hash_matches_blake3() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data: Vec<u8> = (0..200 * 1024).map(|i| (i % 13) as u8).collect();
    let file = create_temp_file(&temp_dir, "big.bin", &data);

    let hash = compute_hash(&file).expect("Failed to compute hash");
    assert_eq!(hash, *blake3::hash(&data).as_bytes());
}

#[test]
fn test_missing_replica_is_create() {
    let temp_dir = tempfile::tempdir().unwrap();
    let src = create_temp_file(&temp_dir, "a.txt", b"a");
    let record = record_for(&src, "a.txt", UNIX_EPOCH);

    assert_eq!(compare_files(&record, None).unwrap(), SyncAction::Create);
    assert!(needs_copy(&record, None).unwrap());
}

#[test]
fn test_size_difference_is_update() {
    let temp_dir = tempfile::tempdir().unwrap();
    let src = create_temp_file(&temp_dir, "src.txt", b"longer content");
    let dst = create_temp_file(&temp_dir, "dst.txt", b"short");

    let action = compare_files(
        &record_for(&src, "x.txt", UNIX_EPOCH),
        Some(&record_for(&dst, "x.txt", UNIX_EPOCH)),
    )
    .unwrap();
    assert_eq!(action, SyncAction::Update);
}

#[test]
fn test_same_size_different_content_is_update() {
    let temp_dir = tempfile::tempdir().unwrap();
    let src = create_temp_file(&temp_dir, "src.txt", b"AAAA");
    let dst = create_temp_file(&temp_dir, "dst.txt", b"BBBB");
    let when = UNIX_EPOCH + Duration::from_secs(1_000);

    let action = compare_files(
        &record_for(&src, "x.txt", when),
        Some(&record_for(&dst, "x.txt", when)),
    )
    .unwrap();
    assert_eq!(action, SyncAction::Update);
}

#[test]
fn test_identical_content_with_different_mtime_is_unchanged() {
    let temp_dir = tempfile::tempdir().unwrap();
    let src = create_temp_file(&temp_dir, "src.txt", b"same bytes");
    let dst = create_temp_file(&temp_dir, "dst.txt", b"same bytes");

    let action = compare_files(
        &record_for(&src, "x.txt", UNIX_EPOCH + Duration::from_secs(5_000)),
        Some(&record_for(&dst, "x.txt", UNIX_EPOCH)),
    )
    .unwrap();
    assert_eq!(action, SyncAction::Unchanged);
}

#[test]
fn test_unreadable_source_is_checksum_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dst = create_temp_file(&temp_dir, "dst.txt", b"1234");
    let gone = temp_dir.path().join("gone.txt");
    let src_record = FileRecord::new(PathBuf::from("x.txt"), gone.clone(), 4, UNIX_EPOCH);

    let err = compare_files(&src_record, Some(&record_for(&dst, "x.txt", UNIX_EPOCH))).unwrap_err();
    assert!(matches!(err, SyncError::Checksum { .. }));
    assert!(err.is_per_entry());
    assert_eq!(err.path(), Some(gone.as_path()));
}

#[test]
fn test_precomputed_checksum_is_used() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dst = create_temp_file(&temp_dir, "dst.txt", b"data");
    let digest = compute_hash(&dst).unwrap();

    // The source path does not exist; only the cached digest can answer.
    let src_record = FileRecord::new(
        PathBuf::from("x.txt"),
        temp_dir.path().join("not-there"),
        4,
        UNIX_EPOCH,
    )
    .with_checksum(digest);

    assert!(src_record.has_checksum());
    assert!(!needs_copy(&src_record, Some(&record_for(&dst, "x.txt", UNIX_EPOCH))).unwrap());
}
