//! Fallback locations used when the operator leaves a path unset.

use std::env;
use std::path::PathBuf;

/// Default log filter expression used by the wrapper.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Log filter applied when the invocation runs in debug mode.
pub const DEBUG_LOG_FILTER: &str = "debug";

/// Directory name used beneath the platform cache directory.
const CACHE_NAMESPACE: &str = "scanwrap";

/// Directory name holding installed extensions beneath the cache directory.
const EXTENSIONS_DIR_NAME: &str = "extensions";

/// File name of the packaged legacy binary shipped next to the wrapper.
#[cfg(windows)]
pub const LEGACY_BUNDLE_NAME: &str = "legacy-cli.exe";
/// File name of the packaged legacy binary shipped next to the wrapper.
#[cfg(not(windows))]
pub const LEGACY_BUNDLE_NAME: &str = "legacy-cli";

/// Default logging format for the wrapper.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Computes the default cache directory.
///
/// Returns `None` when the platform exposes no cache directory.
#[must_use]
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|base| base.join(CACHE_NAMESPACE))
}

/// Extensions live beneath the cache directory unless configured otherwise.
#[must_use]
pub fn default_extensions_dir(cache_dir: &std::path::Path) -> PathBuf {
    cache_dir.join(EXTENSIONS_DIR_NAME)
}

/// The packaged legacy binary is expected next to the running executable.
#[must_use]
pub fn default_legacy_bundle() -> Option<PathBuf> {
    let executable = env::current_exe().ok()?;
    executable
        .parent()
        .map(|directory| directory.join(LEGACY_BUNDLE_NAME))
}
