//! Release constants and cache layout for the legacy binary.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

const CACHE_TARGET: &str = "scanwrap_integrity::cache";

/// File name of the legacy binary inside its versioned cache directory.
#[cfg(windows)]
pub const LEGACY_BINARY_NAME: &str = "legacy-cli.exe";
/// File name of the legacy binary inside its versioned cache directory.
#[cfg(not(windows))]
pub const LEGACY_BINARY_NAME: &str = "legacy-cli";

const LEGACY_VERSION: &str = match option_env!("SCANWRAP_LEGACY_VERSION") {
    Some(version) => version,
    None => "0.0.0",
};

const LEGACY_SHA256: &str = match option_env!("SCANWRAP_LEGACY_SHA256") {
    Some(checksum) => checksum,
    None => "0000000000000000000000000000000000000000000000000000000000000000",
};

/// Version and checksum of the legacy binary bundled with this release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyRelease {
    version: &'static str,
    sha256: &'static str,
}

impl LegacyRelease {
    /// The release compiled into this build.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            version: LEGACY_VERSION,
            sha256: LEGACY_SHA256,
        }
    }

    /// Creates a release description from explicit values.
    #[must_use]
    pub const fn new(version: &'static str, sha256: &'static str) -> Self {
        Self { version, sha256 }
    }

    /// Legacy binary version.
    #[must_use]
    pub const fn version(&self) -> &'static str {
        self.version
    }

    /// Expected lower-case hex SHA-256 of the legacy binary.
    #[must_use]
    pub const fn sha256(&self) -> &'static str {
        self.sha256
    }

    /// Deterministic cache location for this release beneath `cache_dir`.
    #[must_use]
    pub fn cache_path(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(self.version).join(LEGACY_BINARY_NAME)
    }
}

/// Copies the packaged legacy binary into the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleExtractor {
    source: PathBuf,
}

impl BundleExtractor {
    /// Creates an extractor reading from the packaged binary at `source`.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Writes a fresh copy of the bundle to `target`.
    ///
    /// Parent directories are created as needed. The copy lands in a
    /// temporary sibling first and is renamed over `target`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading the bundle or writing the
    /// cache entry.
    pub fn extract_to(&self, target: &Path) -> io::Result<()> {
        let directory = target
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(directory)?;

        let mut staged = NamedTempFile::new_in(directory)?;
        let mut bundle = File::open(&self.source)?;
        let bytes = io::copy(&mut bundle, staged.as_file_mut())?;
        staged.as_file().sync_all()?;
        staged.persist(target).map_err(|error| error.error)?;

        debug!(
            target: CACHE_TARGET,
            source = %self.source.display(),
            target_path = %target.display(),
            bytes,
            "extracted legacy bundle"
        );
        Ok(())
    }
}
