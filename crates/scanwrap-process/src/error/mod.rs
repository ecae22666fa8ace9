//! Domain errors raised while supervising a child process.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising while starting or reaping a child process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The executable does not exist.
    #[error("executable does not exist: {program}")]
    ExecutableNotFound {
        /// Path that was checked.
        program: PathBuf,
    },

    /// The operating system refused to start the process.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        /// Executable that failed to start.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Waiting for the child failed.
    #[error("failed to wait for {program}: {source}")]
    Wait {
        /// Executable being supervised.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The child ended without an exit status, for example by a signal.
    #[error("{program} terminated without an exit status{}", describe_signal(.signal))]
    NoExitStatus {
        /// Executable that terminated.
        program: PathBuf,
        /// Terminating signal, where the platform reports one.
        signal: Option<i32>,
    },
}

fn describe_signal(signal: &Option<i32>) -> String {
    signal.map_or_else(String::new, |number| format!(" (signal {number})"))
}
