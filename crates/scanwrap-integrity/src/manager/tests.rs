//! Unit tests for the verify-or-extract manager.

use std::cell::Cell;
use std::fs;
use std::io;
use std::path::Path;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::checksum::sha256_file;

const GOOD_CONTENT: &[u8] = b"legacy-cli v1\n";
const GOOD_SHA256: &str = "7f7bf09b9045a050def91779779d830892e8a65dba2a23be46dbf824856b6ae8";
const BAD_CONTENT: &[u8] = b"corrupted\n";

#[fixture]
fn cache_dir() -> TempDir {
    TempDir::new().expect("create cache dir")
}

fn record_in(dir: &TempDir) -> IntegrityRecord {
    IntegrityRecord::new(dir.path().join("1.0.0").join("legacy-cli"), GOOD_SHA256)
}

fn write_at(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

// ---------------------------------------------------------------------------
// verify
// ---------------------------------------------------------------------------

#[rstest]
fn verify_accepts_matching_file(cache_dir: TempDir) {
    let record = record_in(&cache_dir);
    write_at(record.path(), GOOD_CONTENT).expect("write binary");
    assert!(record.verify());
}

#[rstest]
fn verify_rejects_missing_file(cache_dir: TempDir) {
    assert!(!record_in(&cache_dir).verify());
}

#[rstest]
fn verify_rejects_mismatched_file(cache_dir: TempDir) {
    let record = record_in(&cache_dir);
    write_at(record.path(), BAD_CONTENT).expect("write binary");
    assert!(!record.verify());
}

#[rstest]
fn verify_ignores_hex_case(cache_dir: TempDir) {
    let path = cache_dir.path().join("legacy-cli");
    write_at(&path, GOOD_CONTENT).expect("write binary");
    let record = IntegrityRecord::new(&path, GOOD_SHA256.to_ascii_uppercase());
    assert!(record.verify());
}

// ---------------------------------------------------------------------------
// ensure_valid
// ---------------------------------------------------------------------------

#[rstest]
fn valid_cache_skips_extraction_and_writes(cache_dir: TempDir) {
    let record = record_in(&cache_dir);
    write_at(record.path(), GOOD_CONTENT).expect("write binary");
    let before = fs::metadata(record.path()).expect("metadata before");

    let calls = Cell::new(0_u32);
    record
        .ensure_valid(|_| {
            calls.set(calls.get() + 1);
            Ok(())
        })
        .expect("cache is valid");

    let after = fs::metadata(record.path()).expect("metadata after");
    assert_eq!(calls.get(), 0);
    assert_eq!(
        before.modified().expect("mtime before"),
        after.modified().expect("mtime after")
    );
    assert_eq!(before.permissions(), after.permissions());
}

#[rstest]
#[case::missing(None)]
#[case::corrupted(Some(BAD_CONTENT))]
fn invalid_cache_is_extracted_once(cache_dir: TempDir, #[case] existing: Option<&[u8]>) {
    let record = record_in(&cache_dir);
    if let Some(content) = existing {
        write_at(record.path(), content).expect("write stale binary");
    }

    let calls = Cell::new(0_u32);
    record
        .ensure_valid(|target| {
            calls.set(calls.get() + 1);
            write_at(target, GOOD_CONTENT)
        })
        .expect("extraction repairs the cache");

    assert_eq!(calls.get(), 1);
    assert_eq!(
        sha256_file(record.path()).expect("hash repaired binary"),
        GOOD_SHA256
    );
}

#[cfg(unix)]
#[rstest]
fn extracted_binary_is_executable(cache_dir: TempDir) {
    use std::os::unix::fs::PermissionsExt;

    let record = record_in(&cache_dir);
    record
        .ensure_valid(|target| write_at(target, GOOD_CONTENT))
        .expect("extract");
    let mode = fs::metadata(record.path())
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0o111, "mode was {mode:o}");
}

#[rstest]
fn mismatch_after_extraction_is_fatal(cache_dir: TempDir) {
    let record = record_in(&cache_dir);
    let calls = Cell::new(0_u32);
    let error = record
        .ensure_valid(|target| {
            calls.set(calls.get() + 1);
            write_at(target, BAD_CONTENT)
        })
        .expect_err("corrupted bundle must fail");

    assert_eq!(calls.get(), 1, "extraction is never retried");
    assert!(matches!(error, IntegrityError::ChecksumMismatch { .. }));
    assert!(error.to_string().contains(GOOD_SHA256));
}

#[rstest]
fn extraction_failure_is_reported(cache_dir: TempDir) {
    let record = record_in(&cache_dir);
    let error = record
        .ensure_valid(|_| Err(io::Error::new(io::ErrorKind::NotFound, "bundle missing")))
        .expect_err("extraction error must surface");
    assert!(matches!(error, IntegrityError::Extraction { .. }));
    assert!(error.to_string().contains("bundle missing"));
}
