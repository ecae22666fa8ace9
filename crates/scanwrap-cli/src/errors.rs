//! Error types for the dispatch runtime.
//!
//! Every failure is reduced to an exit code at the `run` boundary; nothing
//! in this crate panics or exits the process on its own.

use std::io;
use std::sync::Arc;

use scanwrap_config::ConfigError;
use scanwrap_extensions::ExtensionError;
use scanwrap_integrity::IntegrityError;
use scanwrap_process::LaunchError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

/// Exit code reported when the wrapper itself succeeds.
pub const EXIT_CODE_OK: i32 = 0;

/// Exit code reported for every failure raised by the wrapper itself.
pub const EXIT_CODE_ERROR: i32 = 2;

/// Problems with the invocation or the wrapper's own settings.
#[derive(Debug, Error)]
pub(crate) enum ConfigurationError {
    #[error("The following option combination is not currently supported: {combination}")]
    UnsupportedFlagCombination { combination: &'static str },
    #[error("failed to resolve extension command: {0}")]
    UnresolvedCommand(#[source] ExtensionError),
    #[error("failed to encode extension input: {0}")]
    EncodeInput(#[source] ExtensionError),
    #[error("no interception proxy port configured (set --proxy-port or SCANWRAP_PROXY_PORT)")]
    MissingProxyPort,
    #[error(
        "no interception proxy certificate configured (set --ca-cert or SCANWRAP_CA_CERT)"
    )]
    MissingCaCert,
    #[error("legacy binary location unavailable: {reason}")]
    LegacyLocation { reason: String },
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(#[source] ConfigError),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[source] TelemetryError),
    #[error("argument is not valid UTF-8: {argument}")]
    NonUnicodeArgument { argument: String },
}

/// Failure raised anywhere between argument routing and child completion.
#[derive(Debug, Error)]
pub(crate) enum DispatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    #[error(transparent)]
    Launch(#[from] LaunchError),
    #[error("failed to write output: {0}")]
    Output(Arc<io::Error>),
}

impl DispatchError {
    /// Exit code reported for this failure.
    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Integrity(_) | Self::Launch(_) | Self::Output(_) => {
                EXIT_CODE_ERROR
            }
        }
    }
}

impl From<io::Error> for DispatchError {
    fn from(source: io::Error) -> Self {
        Self::Output(Arc::new(source))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::configuration(DispatchError::from(ConfigurationError::MissingProxyPort))]
    #[case::integrity(DispatchError::from(IntegrityError::ChecksumMismatch {
        path: PathBuf::from("/cache/legacy-cli"),
        expected: String::from("abc"),
    }))]
    #[case::launch(DispatchError::from(LaunchError::ExecutableNotFound {
        program: PathBuf::from("/missing"),
    }))]
    #[case::output(DispatchError::from(io::Error::other("closed")))]
    fn every_failure_maps_to_the_generic_exit_code(#[case] error: DispatchError) {
        assert_eq!(error.exit_code(), EXIT_CODE_ERROR);
    }

    #[test]
    fn unsupported_combination_names_the_flags() {
        let error = ConfigurationError::UnsupportedFlagCombination {
            combination: "version + json-file-output",
        };
        assert_eq!(
            error.to_string(),
            "The following option combination is not currently supported: version + json-file-output"
        );
    }

    #[test]
    fn wrapped_errors_render_transparently() {
        let error = DispatchError::from(ConfigurationError::MissingCaCert);
        assert!(error.to_string().starts_with("no interception proxy certificate"));
    }
}
