//! Verify-or-extract logic guarding each launch of the legacy binary.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::checksum::verify;
use crate::error::IntegrityError;

const MANAGER_TARGET: &str = "scanwrap_integrity::manager";

/// Cache location paired with the checksum it must match.
///
/// # Example
///
/// ```
/// use scanwrap_integrity::IntegrityRecord;
///
/// let record = IntegrityRecord::new("/tmp/does-not-exist", "00");
/// assert!(!record.verify());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityRecord {
    path: PathBuf,
    expected_checksum: String,
}

impl IntegrityRecord {
    /// Creates a record for `path` expecting `expected_checksum`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, expected_checksum: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected_checksum: expected_checksum.into(),
        }
    }

    /// Returns the cache location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` when the cached file matches the expected checksum.
    #[must_use]
    pub fn verify(&self) -> bool {
        verify(&self.path, &self.expected_checksum)
    }

    /// Ensures the cached binary exists, is executable, and matches.
    ///
    /// A file that already verifies is left untouched. Otherwise `extract`
    /// is called once to write a fresh copy at the cache path, the copy is
    /// marked executable, and verification runs again.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::Extraction`] when `extract` fails,
    /// [`IntegrityError::Permissions`] when the executable bit cannot be
    /// applied, and [`IntegrityError::ChecksumMismatch`] when the fresh copy
    /// still fails verification.
    pub fn ensure_valid<F>(&self, extract: F) -> Result<(), IntegrityError>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        if self.verify() {
            debug!(
                target: MANAGER_TARGET,
                path = %self.path.display(),
                "cached legacy binary is valid"
            );
            return Ok(());
        }

        info!(
            target: MANAGER_TARGET,
            path = %self.path.display(),
            "cached legacy binary missing or invalid, extracting"
        );
        extract(&self.path).map_err(|source| IntegrityError::Extraction {
            path: self.path.clone(),
            source: Arc::new(source),
        })?;
        mark_executable(&self.path)?;

        if self.verify() {
            debug!(
                target: MANAGER_TARGET,
                path = %self.path.display(),
                "legacy binary valid after extraction"
            );
            return Ok(());
        }

        Err(IntegrityError::ChecksumMismatch {
            path: self.path.clone(),
            expected: self.expected_checksum.clone(),
        })
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<(), IntegrityError> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| {
        IntegrityError::Permissions {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    })
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<(), IntegrityError> {
    Ok(())
}

#[cfg(test)]
mod tests;
