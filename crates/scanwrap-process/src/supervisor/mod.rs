//! Launches a child, feeds its input, and blocks until it exits.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::Arc;

use scanwrap_environment::EnvironmentMap;
use tracing::{debug, warn};

use crate::error::LaunchError;

/// Tracing target for process supervision.
const SUPERVISOR_TARGET: &str = "scanwrap_process::supervisor";

/// How the child's standard input is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinMode {
    /// The child reads the parent's standard input directly.
    Inherit,
    /// The bytes are written once, then the pipe is closed.
    Payload(Vec<u8>),
}

/// Everything needed to start one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    executable: PathBuf,
    args: Vec<String>,
    env: EnvironmentMap,
    stdin: StdinMode,
}

impl LaunchRequest {
    /// Creates a request. The child receives exactly `env` and nothing else
    /// from the parent environment.
    #[must_use]
    pub fn new(
        executable: impl Into<PathBuf>,
        args: Vec<String>,
        env: EnvironmentMap,
        stdin: StdinMode,
    ) -> Self {
        Self {
            executable: executable.into(),
            args,
            env,
            stdin,
        }
    }

    /// Executable to start.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Arguments passed after the program name.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Complete child environment.
    #[must_use]
    pub const fn env(&self) -> &EnvironmentMap {
        &self.env
    }

    /// Standard input mode.
    #[must_use]
    pub const fn stdin(&self) -> &StdinMode {
        &self.stdin
    }
}

/// Starts a child process and waits for its exit code.
///
/// # Example
///
/// ```
/// use scanwrap_process::{LaunchError, LaunchRequest, Launcher};
///
/// struct AlwaysSucceeds;
///
/// impl Launcher for AlwaysSucceeds {
///     fn launch(&self, _request: &LaunchRequest) -> Result<i32, LaunchError> {
///         Ok(0)
///     }
/// }
/// ```
pub trait Launcher {
    /// Runs the request to completion and returns the child's exit code.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] when the child cannot be started or ends
    /// without a determinable exit status.
    fn launch(&self, request: &LaunchRequest) -> Result<i32, LaunchError>;
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(&self, request: &LaunchRequest) -> Result<i32, LaunchError> {
        (**self).launch(request)
    }
}

/// Launches real operating-system processes.
///
/// The child stays in the parent's process group so terminal signals such
/// as an interrupt reach both. No timeout is imposed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<i32, LaunchError> {
        let program = request.executable();
        let mut child = spawn(request)?;

        if let StdinMode::Payload(payload) = request.stdin() {
            match child.stdin.take() {
                Some(stdin) => write_payload(program, stdin, payload),
                None => warn!(
                    target: SUPERVISOR_TARGET,
                    program = %program.display(),
                    "child stdin was not captured"
                ),
            }
        }

        let status = wait(program, &mut child)?;
        exit_code(program, status)
    }
}

fn spawn(request: &LaunchRequest) -> Result<Child, LaunchError> {
    let program = request.executable();
    if !program.exists() {
        return Err(LaunchError::ExecutableNotFound {
            program: program.to_path_buf(),
        });
    }

    let mut command = Command::new(program);
    command
        .args(request.args())
        .env_clear()
        .envs(request.env().iter())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    match request.stdin() {
        StdinMode::Inherit => command.stdin(Stdio::inherit()),
        StdinMode::Payload(_) => command.stdin(Stdio::piped()),
    };

    debug!(
        target: SUPERVISOR_TARGET,
        program = %program.display(),
        args = ?request.args(),
        env_vars = request.env().len(),
        "spawning child process"
    );

    command.spawn().map_err(|source| LaunchError::Spawn {
        program: program.to_path_buf(),
        source: Arc::new(source),
    })
}

/// Writes the payload and closes the pipe by dropping `stdin`.
///
/// A child that exits without reading its input closes the pipe early; the
/// resulting error is logged and the child's own exit status still decides
/// the outcome.
fn write_payload(program: &Path, mut stdin: ChildStdin, payload: &[u8]) {
    let outcome = stdin.write_all(payload).and_then(|()| stdin.flush());
    match outcome {
        Ok(()) => debug!(
            target: SUPERVISOR_TARGET,
            program = %program.display(),
            payload_bytes = payload.len(),
            "wrote payload to child stdin"
        ),
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => debug!(
            target: SUPERVISOR_TARGET,
            program = %program.display(),
            "child closed stdin before reading the full payload"
        ),
        Err(error) => warn!(
            target: SUPERVISOR_TARGET,
            program = %program.display(),
            %error,
            "failed to write payload to child stdin"
        ),
    }
}

fn wait(program: &Path, child: &mut Child) -> Result<ExitStatus, LaunchError> {
    let status = child.wait().map_err(|source| LaunchError::Wait {
        program: program.to_path_buf(),
        source: Arc::new(source),
    })?;
    debug!(
        target: SUPERVISOR_TARGET,
        program = %program.display(),
        ?status,
        "child process exited"
    );
    Ok(status)
}

fn exit_code(program: &Path, status: ExitStatus) -> Result<i32, LaunchError> {
    status.code().ok_or_else(|| LaunchError::NoExitStatus {
        program: program.to_path_buf(),
        signal: terminating_signal(status),
    })
}

#[cfg(unix)]
fn terminating_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: ExitStatus) -> Option<i32> {
    None
}
