//! Commands answered by the wrapper itself without starting a process.

use std::io::Write;

use crate::context::Versions;
use crate::errors::{ConfigurationError, DispatchError, EXIT_CODE_OK};

const VERSION_TOKENS: &[&str] = &["--version", "-v", "version"];
const JSON_FILE_OUTPUT_FLAG: &str = "--json-file-output";

/// Handlers implemented directly by the wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinHandler {
    Version,
}

impl BuiltinHandler {
    /// Selects a handler when any argument is one of its trigger tokens.
    pub(crate) fn matching(args: &[String]) -> Option<Self> {
        args.iter()
            .any(|argument| VERSION_TOKENS.contains(&argument.as_str()))
            .then_some(Self::Version)
    }

    pub(crate) fn execute<W>(
        self,
        args: &[String],
        versions: &Versions,
        stdout: &mut W,
    ) -> Result<i32, DispatchError>
    where
        W: Write,
    {
        match self {
            Self::Version => {
                if args.iter().any(|argument| is_json_file_output(argument)) {
                    return Err(ConfigurationError::UnsupportedFlagCombination {
                        combination: "version + json-file-output",
                    }
                    .into());
                }
                writeln!(stdout, "{}", versions.display())?;
                stdout.flush()?;
                Ok(EXIT_CODE_OK)
            }
        }
    }
}

fn is_json_file_output(argument: &str) -> bool {
    argument
        .strip_prefix(JSON_FILE_OUTPUT_FLAG)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('='))
}
