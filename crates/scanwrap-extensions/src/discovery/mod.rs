//! Discovery of installed extensions on disk.
//!
//! Each subdirectory of the extensions directory that contains an
//! [`MANIFEST_FILE_NAME`] file describes one extension. Subdirectories are
//! visited in sorted order so registration order, and therefore which
//! extension wins a command-name clash, is stable across runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ExtensionError;
use crate::manifest::{Extension, ExtensionManifest};
use crate::registry::ExtensionRegistry;

const DISCOVERY_TARGET: &str = "scanwrap_extensions::discovery";

/// Name of the manifest file inside each extension directory.
pub const MANIFEST_FILE_NAME: &str = "extension.json";

/// Loads every extension found beneath `directory`.
///
/// A missing directory yields an empty registry. Unreadable or malformed
/// manifests are logged and skipped.
///
/// # Errors
///
/// Returns [`ExtensionError::ScanDirectory`] when the directory exists but
/// cannot be listed.
pub fn discover(directory: &Path) -> Result<ExtensionRegistry, ExtensionError> {
    let mut registry = ExtensionRegistry::new();
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(
                target: DISCOVERY_TARGET,
                directory = %directory.display(),
                "extensions directory absent"
            );
            return Ok(registry);
        }
        Err(source) => {
            return Err(ExtensionError::ScanDirectory {
                path: directory.to_path_buf(),
                source: Arc::new(source),
            });
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    candidates.sort();

    for candidate in candidates {
        let manifest_path = candidate.join(MANIFEST_FILE_NAME);
        if !manifest_path.is_file() {
            continue;
        }
        let outcome = load_extension(&candidate, &manifest_path)
            .and_then(|extension| registry.register(extension));
        if let Err(error) = outcome {
            warn!(
                target: DISCOVERY_TARGET,
                manifest = %manifest_path.display(),
                %error,
                "skipping extension"
            );
        }
    }

    debug!(
        target: DISCOVERY_TARGET,
        directory = %directory.display(),
        count = registry.len(),
        "discovered extensions"
    );
    Ok(registry)
}

fn load_extension(directory: &Path, manifest_path: &Path) -> Result<Extension, ExtensionError> {
    let raw = fs::read(manifest_path).map_err(|source| ExtensionError::ReadManifest {
        path: manifest_path.to_path_buf(),
        source: Arc::new(source),
    })?;
    let manifest: ExtensionManifest =
        serde_json::from_slice(&raw).map_err(|source| ExtensionError::ParseManifest {
            path: manifest_path.to_path_buf(),
            source: Arc::new(source),
        })?;
    Ok(manifest.into_extension(directory))
}
