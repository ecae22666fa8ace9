//! Domain errors raised while validating the cached legacy binary.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising while materialising or validating the legacy binary.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// Copying the packaged binary into the cache failed.
    #[error("failed to extract legacy binary to {path}: {source}")]
    Extraction {
        /// Cache location being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The executable bit could not be applied to the extracted file.
    #[error("failed to mark {path} as executable: {source}")]
    Permissions {
        /// Cache location being updated.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The checksum still differs after a fresh extraction.
    #[error("legacy binary at {path} failed checksum verification after extraction (expected {expected})")]
    ChecksumMismatch {
        /// Cache location that failed verification.
        path: PathBuf,
        /// Checksum compiled into the release.
        expected: String,
    },
}
