//! SHA-256 hashing of files on disk.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

const CHECKSUM_TARGET: &str = "scanwrap_integrity::checksum";

/// Computes the lower-case hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns the I/O error raised while opening or reading the file.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Returns `true` when the file at `path` hashes to `expected`.
///
/// A missing or unreadable file counts as a failed verification. The
/// comparison ignores ASCII case in the expected hex digest.
#[must_use]
pub fn verify(path: &Path, expected: &str) -> bool {
    match sha256_file(path) {
        Ok(actual) => {
            let matches = actual.eq_ignore_ascii_case(expected.trim());
            debug!(
                target: CHECKSUM_TARGET,
                path = %path.display(),
                %actual,
                expected,
                matches,
                "computed checksum"
            );
            matches
        }
        Err(error) => {
            debug!(
                target: CHECKSUM_TARGET,
                path = %path.display(),
                %error,
                "checksum unavailable"
            );
            false
        }
    }
}
