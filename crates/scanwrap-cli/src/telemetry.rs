//! Structured telemetry initialisation for the wrapper.
//!
//! Logs always go to stderr so they never mix with the child's stdout.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use scanwrap_config::{DEBUG_LOG_FILTER, LogFormat};
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub(crate) enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Logging settings resolved for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TelemetrySettings {
    filter: String,
    format: LogFormat,
}

impl TelemetrySettings {
    /// Debug mode overrides the configured filter.
    pub(crate) fn new(configured: &str, format: LogFormat, debug_mode: bool) -> Self {
        let selected = if debug_mode {
            DEBUG_LOG_FILTER
        } else {
            configured
        };
        Self {
            filter: selected.to_owned(),
            format,
        }
    }

    pub(crate) fn filter(&self) -> &str {
        &self.filter
    }
}

/// Installs the global subscriber on the first call.
///
/// Later calls are no-ops, which keeps repeated `run` invocations in one
/// process (as in tests) from fighting over the global default.
pub(crate) fn initialise(settings: &TelemetrySettings) -> Result<(), TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(settings))
        .map(|_| ())
}

fn install_subscriber(settings: &TelemetrySettings) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(settings.filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match settings.format {
        LogFormat::Json => Box::new(builder(env_filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(env_filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
