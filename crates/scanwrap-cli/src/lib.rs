//! Dispatch runtime for the `scanwrap` wrapper.
//!
//! `scanwrap` sits in front of a legacy scanner binary and a set of
//! installed extensions. Each invocation is routed to exactly one of three
//! paths:
//!
//! - a built-in handler answered in-process (currently only `version`);
//! - an extension whose command name matches the first positional token,
//!   which receives a JSON description of the invocation on stdin;
//! - the legacy binary, verified against its release checksum and run with
//!   the arguments forwarded verbatim.
//!
//! Every child process runs with an environment that forces traffic through
//! the local interception proxy. The runtime is exercised from the binary
//! entrypoint and from tests where configuration loading, the process
//! launcher, and the IO streams are substituted.

use std::ffi::OsString;
use std::io::Write;

use scanwrap_process::{Launcher, SystemLauncher};
use tracing::debug;

mod builtin;
mod config;
mod context;
mod dispatch;
mod errors;
mod router;
mod telemetry;

use config::{ConfigArgumentSplit, ConfigLoader, EnvConfigLoader, split_config_arguments};
use context::DispatchContext;
use dispatch::{Dispatcher, report_failure};
use errors::{ConfigurationError, DispatchError};
pub use errors::{EXIT_CODE_ERROR, EXIT_CODE_OK};
use telemetry::TelemetrySettings;

const RUNTIME_TARGET: &str = "scanwrap_cli";
const DEBUG_FLAGS: &[&str] = &["--debug", "-d"];

/// Bundles the IO streams used for human-facing output.
///
/// Child processes write to the real process streams directly; these
/// writers only carry the wrapper's own output and diagnostics.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }

    fn flush(&mut self) {
        if let Err(error) = self.stdout.flush().and_then(|()| self.stderr.flush()) {
            debug!(target: RUNTIME_TARGET, %error, "failed to flush output streams");
        }
    }
}

/// Runs one wrapper invocation and returns the process exit code.
///
/// `args` starts with the program name. Leading wrapper flags configure
/// the wrapper; the remaining arguments are dispatched. This function never
/// panics: every failure is written to `stderr` and reported as
/// [`EXIT_CODE_ERROR`].
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &EnvConfigLoader, SystemLauncher)
}

pub(crate) fn run_with_loader<I, W, E, C, L>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &C,
    launcher: L,
) -> i32
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    C: ConfigLoader,
    L: Launcher,
{
    let code = match bootstrap(args, loader) {
        Ok((context, passthrough)) => {
            Dispatcher::new(&context, launcher).dispatch(&passthrough, io)
        }
        Err(error) => report_failure(&error, &mut *io.stderr),
    };
    io.flush();
    code
}

fn bootstrap<I, C>(args: I, loader: &C) -> Result<(DispatchContext, Vec<String>), DispatchError>
where
    I: IntoIterator<Item = OsString>,
    C: ConfigLoader,
{
    let raw_arguments: Vec<OsString> = args.into_iter().collect();
    let ConfigArgumentSplit {
        config_arguments,
        passthrough: raw_passthrough,
    } = split_config_arguments(&raw_arguments);

    let passthrough = passthrough_strings(raw_passthrough)?;
    let config = loader.load(&config_arguments)?;
    let debug_mode = is_debug(&passthrough);
    telemetry::initialise(&TelemetrySettings::new(
        config.log_filter(),
        config.log_format(),
        debug_mode,
    ))
    .map_err(ConfigurationError::Telemetry)?;

    debug!(
        target: RUNTIME_TARGET,
        passthrough = ?passthrough,
        debug_mode,
        "starting invocation"
    );
    Ok((DispatchContext::from_config(&config, debug_mode), passthrough))
}

fn passthrough_strings(arguments: Vec<OsString>) -> Result<Vec<String>, ConfigurationError> {
    arguments
        .into_iter()
        .map(|argument| {
            argument
                .into_string()
                .map_err(|raw| ConfigurationError::NonUnicodeArgument {
                    argument: raw.to_string_lossy().into_owned(),
                })
        })
        .collect()
}

fn is_debug(args: &[String]) -> bool {
    args.iter()
        .any(|argument| DEBUG_FLAGS.contains(&argument.as_str()))
}

#[cfg(test)]
mod tests;
