//! Integrity checks for the cached legacy binary.
//!
//! The legacy scanner is shipped as a packaged artefact and copied into a
//! version-scoped cache directory before it runs. Every invocation hashes the
//! cached copy with SHA-256 and compares it against the checksum compiled into
//! the release. A mismatch triggers exactly one fresh extraction; a mismatch
//! that survives extraction is fatal because it points at corrupted packaging.
//!
//! ```rust,no_run
//! use scanwrap_integrity::{BundleExtractor, IntegrityRecord, LegacyRelease};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), scanwrap_integrity::IntegrityError> {
//! let release = LegacyRelease::current();
//! let record = IntegrityRecord::new(
//!     release.cache_path(Path::new("/var/cache/scanwrap")),
//!     release.sha256(),
//! );
//! let extractor = BundleExtractor::new("/opt/scanwrap/legacy-cli");
//! record.ensure_valid(|target| extractor.extract_to(target))?;
//! # Ok(()) }
//! ```
//!
//! Concurrent invocations racing on the same cache path are not mutually
//! excluded. Extraction writes to a temporary sibling and renames it into
//! place, so readers observe either the old or the new file.

mod cache;
mod checksum;
mod error;
mod manager;

pub use cache::{BundleExtractor, LEGACY_BINARY_NAME, LegacyRelease};
pub use checksum::{sha256_file, verify};
pub use error::IntegrityError;
pub use manager::IntegrityRecord;
