//! Domain errors raised by extension operations.
//!
//! I/O errors are wrapped in `Arc` to keep the enum small and cloneable
//! across reporting layers.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from extension discovery, routing, and encoding.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// An extension failed validation.
    #[error("manifest error: {message}")]
    Manifest {
        /// Description of the validation failure.
        message: String,
    },

    /// An extension manifest could not be read.
    #[error("failed to read extension manifest {path}: {source}")]
    ReadManifest {
        /// Manifest location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// An extension manifest is not valid JSON for the manifest schema.
    #[error("failed to parse extension manifest {path}: {source}")]
    ParseManifest {
        /// Manifest location.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The extensions directory could not be listed.
    #[error("failed to scan extensions directory {path}: {source}")]
    ScanDirectory {
        /// Directory being scanned.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The invocation does not resolve to a known command.
    #[error("unable to resolve command path for '{token}'")]
    UnresolvedCommand {
        /// Token that failed to match.
        token: String,
    },

    /// The extension input could not be serialised.
    #[error("failed to serialise extension input: {0}")]
    SerializeInput(#[source] serde_json::Error),
}
