//! CLI entrypoint for the `scanwrap` dispatcher.
//!
//! The binary delegates to [`scanwrap_cli::run`] and exits with the code it
//! returns, which is the child's own code whenever a child ran.

use std::io::{self, StderrLock, StdoutLock};

fn main() {
    let code = {
        let mut stdout: StdoutLock<'_> = io::stdout().lock();
        let mut stderr: StderrLock<'_> = io::stderr().lock();
        scanwrap_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
    };
    std::process::exit(code);
}
