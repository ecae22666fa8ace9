//! Child process supervision for `scanwrap`.
//!
//! [`SystemLauncher`] is the single place where operating-system process
//! semantics are translated into the dispatcher's vocabulary: a child that
//! exits with a status yields that status unchanged, while a child that
//! cannot be started, or ends without a determinable status, yields a
//! [`LaunchError`].
//!
//! Standard output and standard error are always inherited so the child
//! streams straight to the terminal. Standard input is either inherited or
//! replaced with a fixed payload that is written once and then closed.
//!
//! The [`Launcher`] trait lets dispatch logic be exercised with recording
//! doubles instead of real processes.

mod error;
mod supervisor;

pub use error::LaunchError;
pub use supervisor::{LaunchRequest, Launcher, StdinMode, SystemLauncher};
