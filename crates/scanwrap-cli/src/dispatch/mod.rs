//! Runs one invocation from routing to a child's exit code.
//!
//! Each invocation moves through routing into exactly one of the builtin,
//! extension, or legacy paths and ends with an exit code. Nothing is retried
//! and no path falls through to another once selected.

use std::io::Write;

use scanwrap_environment::{EnvironmentMap, EnvironmentSanitizer, InterceptionProxy};
use scanwrap_extensions::{Extension, ExtensionInput};
use scanwrap_process::{LaunchRequest, Launcher, StdinMode};
use tracing::debug;

use crate::IoStreams;
use crate::context::DispatchContext;
use crate::errors::{ConfigurationError, DispatchError};
use crate::router::{Route, route};

const DISPATCH_TARGET: &str = "scanwrap_cli::dispatch";

pub(crate) struct Dispatcher<'c, L> {
    context: &'c DispatchContext,
    launcher: L,
}

impl<'c, L> Dispatcher<'c, L>
where
    L: Launcher,
{
    pub(crate) const fn new(context: &'c DispatchContext, launcher: L) -> Self {
        Self { context, launcher }
    }

    /// Dispatches `args` and always yields an exit code.
    pub(crate) fn dispatch<W, E>(&self, args: &[String], io: &mut IoStreams<'_, W, E>) -> i32
    where
        W: Write,
        E: Write,
    {
        match self.execute(args, io) {
            Ok(code) => {
                debug!(target: DISPATCH_TARGET, code, "invocation finished");
                code
            }
            Err(error) => report_failure(&error, &mut *io.stderr),
        }
    }

    fn execute<W, E>(
        &self,
        args: &[String],
        io: &mut IoStreams<'_, W, E>,
    ) -> Result<i32, DispatchError>
    where
        W: Write,
        E: Write,
    {
        let selected = route(args, self.context.registry(), self.context.command_tree())?;
        debug!(target: DISPATCH_TARGET, route = selected.name(), "routed invocation");

        match selected {
            Route::Builtin(handler) => {
                handler.execute(args, self.context.versions(), &mut *io.stdout)
            }
            Route::Extension {
                extension,
                matched_command_path,
            } => self.run_extension(extension, matched_command_path, args, &mut *io.stderr),
            Route::LegacyFallback => self.run_legacy(args, &mut *io.stderr),
        }
    }

    fn run_extension<E>(
        &self,
        extension: &Extension,
        matched_command_path: Vec<String>,
        args: &[String],
        stderr: &mut E,
    ) -> Result<i32, DispatchError>
    where
        E: Write,
    {
        let proxy = self.context.interception_proxy()?;
        let input = ExtensionInput::new(
            extension.metadata().clone(),
            matched_command_path,
            args.to_vec(),
            self.context.debug(),
            self.context.proxy_port()?,
        );
        let payload = input.encode().map_err(ConfigurationError::EncodeInput)?;
        let env = self.child_environment(proxy, stderr);

        debug!(
            target: DISPATCH_TARGET,
            extension = extension.metadata().name(),
            binary = %extension.binary_path().display(),
            "launching extension"
        );
        let request = LaunchRequest::new(
            extension.binary_path(),
            Vec::new(),
            env,
            StdinMode::Payload(payload),
        );
        Ok(self.launcher.launch(&request)?)
    }

    fn run_legacy<E>(&self, args: &[String], stderr: &mut E) -> Result<i32, DispatchError>
    where
        E: Write,
    {
        let proxy = self.context.interception_proxy()?;
        let legacy = self.context.legacy()?;
        let record = legacy.record();
        record.ensure_valid(|target| legacy.extractor().extract_to(target))?;
        let env = self.child_environment(proxy, stderr);

        debug!(
            target: DISPATCH_TARGET,
            binary = %record.path().display(),
            "launching legacy binary"
        );
        let request = LaunchRequest::new(record.path(), args.to_vec(), env, StdinMode::Inherit);
        Ok(self.launcher.launch(&request)?)
    }

    fn child_environment<E>(&self, proxy: InterceptionProxy, stderr: &mut E) -> EnvironmentMap
    where
        E: Write,
    {
        let sanitizer =
            EnvironmentSanitizer::new(proxy, self.context.versions().integration_identity());
        let (env, identity_warning) = sanitizer
            .build(self.context.parent_env().clone())
            .into_parts();
        if let Some(warning) = identity_warning {
            // The warning never blocks the launch, even when stderr is gone.
            if let Err(write_error) = writeln!(stderr, "WARNING! {warning}") {
                debug!(target: DISPATCH_TARGET, %write_error, "failed to write warning");
            }
        }
        env
    }
}

/// Writes the failure to `stderr` and returns its exit code.
pub(crate) fn report_failure<E>(error: &DispatchError, stderr: &mut E) -> i32
where
    E: Write,
{
    debug!(target: DISPATCH_TARGET, %error, "invocation failed");
    if let Err(write_error) = writeln!(stderr, "{error}") {
        debug!(target: DISPATCH_TARGET, %write_error, "failed to write diagnostic");
    }
    error.exit_code()
}
