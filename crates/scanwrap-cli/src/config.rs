//! Configuration loading helpers for the wrapper.
//!
//! Wrapper flags share the command line with arguments meant for the legacy
//! binary or an extension. Only flags at the very front, before the first
//! command token, configure the wrapper; everything after that is passed
//! through untouched.

use std::ffi::{OsStr, OsString};

use scanwrap_config::Config;

use crate::errors::ConfigurationError;

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of `scanwrap_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--proxy-port",
    "--ca-cert",
    "--cache-dir",
    "--legacy-bundle",
    "--extensions-dir",
    "--log-filter",
    "--log-format",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the wrapper's own flags and the environment.
    ///
    /// `args` holds the program name followed by the leading configuration
    /// flags only.
    fn load(&self, args: &[OsString]) -> Result<Config, ConfigurationError>;
}

/// Reads flags and `SCANWRAP_*` variables through clap.
pub(crate) struct EnvConfigLoader;

impl ConfigLoader for EnvConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, ConfigurationError> {
        Config::load_from_iter(args.iter().cloned()).map_err(ConfigurationError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn process_config_flag(argument: &OsStr) -> FlagAction {
    let argument_text = argument.to_string_lossy();
    if !argument_text.starts_with("--") {
        return FlagAction::Stop;
    }

    let mut flag_parts = argument_text.splitn(2, '=');
    let flag = flag_parts.next().unwrap_or_default();
    let has_inline_value = flag_parts.next().is_some();

    if CONFIG_CLI_FLAGS.contains(&flag) {
        return FlagAction::Include {
            needs_value: !has_inline_value,
        };
    }

    FlagAction::Stop
}

/// Leading configuration arguments and where the passthrough begins.
#[derive(Debug)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) passthrough: Vec<OsString>,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let mut iter = args.iter();
    let Some(program) = iter.next() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            passthrough: Vec::new(),
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut passthrough = Vec::new();
    let mut pending_values = 0usize;

    for argument in iter.by_ref() {
        if pending_values > 0 {
            config_arguments.push(argument.clone());
            pending_values -= 1;
            continue;
        }

        match process_config_flag(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                if needs_value {
                    pending_values = 1;
                }
            }
            FlagAction::Stop => {
                passthrough.push(argument.clone());
                break;
            }
        }
    }
    passthrough.extend(iter.cloned());

    ConfigArgumentSplit {
        config_arguments,
        passthrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os_args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn inline_value_flags_do_not_need_follow_up_value() {
        let result = process_config_flag(OsStr::new("--proxy-port=8080"));
        match result {
            FlagAction::Include { needs_value } => assert!(!needs_value),
            FlagAction::Stop => panic!("expected include for known inline flag"),
        }
    }

    #[test]
    fn separate_value_flags_consume_following_argument() {
        let result = process_config_flag(OsStr::new("--ca-cert"));
        match result {
            FlagAction::Include { needs_value } => assert!(needs_value),
            FlagAction::Stop => panic!("expected include for known separated flag"),
        }
    }

    #[test]
    fn non_flag_arguments_signal_stop() {
        let result = process_config_flag(OsStr::new("test"));
        assert!(matches!(result, FlagAction::Stop), "should stop");
    }

    #[test]
    fn unknown_flags_signal_stop() {
        let result = process_config_flag(OsStr::new("--json"));
        assert!(matches!(result, FlagAction::Stop), "should stop");
    }

    #[test]
    fn leading_flags_are_split_from_passthrough() {
        let args = os_args(&[
            "scanwrap",
            "--proxy-port",
            "8080",
            "--ca-cert=/tmp/ca.pem",
            "test",
            "--json",
        ]);
        let split = split_config_arguments(&args);
        assert_eq!(
            split.config_arguments,
            os_args(&["scanwrap", "--proxy-port", "8080", "--ca-cert=/tmp/ca.pem"])
        );
        assert_eq!(split.passthrough, os_args(&["test", "--json"]));
    }

    #[test]
    fn config_flags_after_command_are_passed_through() {
        let args = os_args(&["scanwrap", "test", "--proxy-port", "9000"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, os_args(&["scanwrap"]));
        assert_eq!(
            split.passthrough,
            os_args(&["test", "--proxy-port", "9000"])
        );
    }

    #[test]
    fn leading_unknown_flag_starts_passthrough() {
        let args = os_args(&["scanwrap", "--version", "--log-filter", "debug"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, os_args(&["scanwrap"]));
        assert_eq!(
            split.passthrough,
            os_args(&["--version", "--log-filter", "debug"])
        );
    }

    #[test]
    fn empty_arguments_yield_empty_split() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert!(split.passthrough.is_empty());
    }
}
