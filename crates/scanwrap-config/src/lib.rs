//! Shared configuration for the `scanwrap` dispatcher.
//!
//! Every setting can be supplied either as a leading command-line flag or as
//! a `SCANWRAP_*` environment variable. Flags win over the environment, and
//! the environment wins over the built-in defaults in [`defaults`].
//!
//! The configuration is loaded once at startup and handed to the dispatcher
//! as an explicit value; nothing downstream reads process state on its own.

use std::ffi::OsString;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use thiserror::Error;

pub mod defaults;
mod logging;

pub use defaults::{
    DEBUG_LOG_FILTER, DEFAULT_LOG_FILTER, LEGACY_BUNDLE_NAME, default_cache_dir,
    default_extensions_dir, default_legacy_bundle, default_log_format,
};
pub use logging::LogFormat;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A flag or environment variable carried an invalid value.
    #[error("invalid configuration: {0}")]
    Parse(#[source] Box<clap::Error>),

    /// No cache directory was configured and the platform offers none.
    #[error("no cache directory configured and the platform provides no default")]
    MissingCacheDirectory,

    /// No legacy bundle was configured and the executable location is unknown.
    #[error("no legacy bundle configured and the wrapper location cannot be determined")]
    MissingLegacyBundle,
}

/// Wrapper configuration assembled from flags, environment, and defaults.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "scanwrap",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Config {
    /// Port of the local interception proxy.
    #[arg(long, env = "SCANWRAP_PROXY_PORT")]
    proxy_port: Option<u16>,

    /// Certificate authority file issued by the interception proxy.
    ///
    /// The path is exported verbatim to children, so it must be UTF-8.
    #[arg(long, env = "SCANWRAP_CA_CERT")]
    ca_cert: Option<Utf8PathBuf>,

    /// Directory holding the cached legacy binary.
    #[arg(long, env = "SCANWRAP_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Packaged legacy binary extracted into the cache when needed.
    #[arg(long, env = "SCANWRAP_LEGACY_BUNDLE")]
    legacy_bundle: Option<PathBuf>,

    /// Directory scanned for installed extensions.
    #[arg(long, env = "SCANWRAP_EXTENSIONS_DIR")]
    extensions_dir: Option<PathBuf>,

    /// Tracing filter expression.
    #[arg(long, env = "SCANWRAP_LOG_FILTER", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,

    /// Tracing output format.
    #[arg(long, env = "SCANWRAP_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy_port: None,
            ca_cert: None,
            cache_dir: None,
            legacy_bundle: None,
            extensions_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Loads configuration from the supplied arguments and the environment.
    ///
    /// The first item is treated as the program name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a flag or environment variable
    /// holds a value of the wrong shape, including a non-UTF-8 CA path.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|error| ConfigError::Parse(Box::new(error)))
    }

    /// Overrides the proxy port.
    #[must_use]
    pub const fn with_proxy_port(mut self, port: u16) -> Self {
        self.proxy_port = Some(port);
        self
    }

    /// Overrides the certificate authority path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// Overrides the cache directory.
    #[must_use]
    pub fn with_cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(path.into());
        self
    }

    /// Overrides the packaged legacy binary location.
    #[must_use]
    pub fn with_legacy_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.legacy_bundle = Some(path.into());
        self
    }

    /// Overrides the extensions directory.
    #[must_use]
    pub fn with_extensions_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.extensions_dir = Some(path.into());
        self
    }

    /// Port of the interception proxy, when configured.
    #[must_use]
    pub const fn proxy_port(&self) -> Option<u16> {
        self.proxy_port
    }

    /// Certificate authority path, when configured.
    #[must_use]
    pub fn ca_cert(&self) -> Option<&Utf8Path> {
        self.ca_cert.as_deref()
    }

    /// Tracing filter expression.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Tracing output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Resolves the cache directory, falling back to the platform default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCacheDirectory`] when neither a
    /// configured nor a platform directory is available.
    pub fn cache_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.cache_dir {
            Some(path) => Ok(path.clone()),
            None => default_cache_dir().ok_or(ConfigError::MissingCacheDirectory),
        }
    }

    /// Resolves the extensions directory.
    ///
    /// # Errors
    ///
    /// Propagates [`Config::cache_dir`] failures when no explicit directory
    /// was configured.
    pub fn extensions_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.extensions_dir {
            Some(path) => Ok(path.clone()),
            None => self
                .cache_dir()
                .map(|cache| default_extensions_dir(&cache)),
        }
    }

    /// Resolves the packaged legacy binary location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingLegacyBundle`] when no path was
    /// configured and the wrapper's own location is unknown.
    pub fn legacy_bundle(&self) -> Result<PathBuf, ConfigError> {
        match &self.legacy_bundle {
            Some(path) => Ok(path.clone()),
            None => default_legacy_bundle().ok_or(ConfigError::MissingLegacyBundle),
        }
    }
}
