//! Chooses the single execution path for an invocation.
//!
//! Precedence is fixed: a built-in handler matched anywhere in the
//! arguments, then an extension whose command name equals the first
//! positional token, then the legacy binary.

use scanwrap_extensions::{CommandTree, Extension, ExtensionRegistry};

use crate::builtin::BuiltinHandler;
use crate::errors::ConfigurationError;

/// Execution path selected for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Route<'a> {
    Builtin(BuiltinHandler),
    Extension {
        extension: &'a Extension,
        matched_command_path: Vec<String>,
    },
    LegacyFallback,
}

impl Route<'_> {
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Self::Builtin(_) => "builtin",
            Self::Extension { .. } => "extension",
            Self::LegacyFallback => "legacy",
        }
    }
}

pub(crate) fn route<'a>(
    args: &[String],
    registry: &'a ExtensionRegistry,
    tree: &CommandTree,
) -> Result<Route<'a>, ConfigurationError> {
    if let Some(handler) = BuiltinHandler::matching(args) {
        return Ok(Route::Builtin(handler));
    }

    let first_positional = args.iter().find(|argument| !argument.starts_with('-'));
    let Some(extension) = first_positional.and_then(|token| registry.find_by_command(token))
    else {
        return Ok(Route::LegacyFallback);
    };

    let matched_command_path = tree
        .resolve(args)
        .map_err(ConfigurationError::UnresolvedCommand)?;
    Ok(Route::Extension {
        extension,
        matched_command_path,
    })
}

#[cfg(test)]
mod tests;
