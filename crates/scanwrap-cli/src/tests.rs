use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use rstest::rstest;
use scanwrap_config::Config;
use scanwrap_process::{LaunchError, LaunchRequest};
use tempfile::TempDir;

use super::*;

struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, ConfigurationError> {
        Ok(self.config.clone())
    }
}

/// Records the arguments the loader was handed.
struct CapturingLoader {
    seen: RefCell<Vec<OsString>>,
}

impl ConfigLoader for CapturingLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, ConfigurationError> {
        self.seen.replace(args.to_vec());
        Ok(Config::default())
    }
}

#[derive(Default)]
struct RecordingLauncher {
    launched: RefCell<Vec<PathBuf>>,
}

impl Launcher for RecordingLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<i32, LaunchError> {
        self.launched
            .borrow_mut()
            .push(request.executable().to_path_buf());
        Ok(0)
    }
}

fn os_args(values: &[&str]) -> Vec<OsString> {
    values.iter().map(OsString::from).collect()
}

fn ca_cert_in(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(dir.path().join("ca.pem")).expect("utf-8 temp path")
}

fn isolated_config(dir: &TempDir) -> Config {
    Config::default()
        .with_cache_dir(dir.path().join("cache"))
        .with_extensions_dir(dir.path().join("extensions"))
        .with_legacy_bundle(dir.path().join("missing-bundle"))
}

struct Outcome {
    code: i32,
    stdout: String,
    stderr: String,
    launched: Vec<PathBuf>,
}

fn run_captured<C: ConfigLoader>(argv: &[&str], loader: &C) -> Outcome {
    let launcher = RecordingLauncher::default();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        run_with_loader(os_args(argv), &mut io, loader, &launcher)
    };
    Outcome {
        code,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
        launched: launcher.launched.into_inner(),
    }
}

#[test]
fn version_is_printed_without_proxy_configuration() {
    let dir = TempDir::new().expect("temp dir");
    let loader = StaticConfigLoader::new(isolated_config(&dir));

    let outcome = run_captured(&["scanwrap", "version"], &loader);

    assert_eq!(outcome.code, EXIT_CODE_OK, "stderr: {}", outcome.stderr);
    assert!(outcome.launched.is_empty());
    assert_eq!(
        outcome.stdout.trim_end(),
        format!(
            "{}.{}",
            env!("CARGO_PKG_VERSION"),
            scanwrap_integrity::LegacyRelease::current().version()
        )
    );
}

#[test]
fn legacy_path_without_proxy_reports_configuration_error() {
    let dir = TempDir::new().expect("temp dir");
    let loader = StaticConfigLoader::new(isolated_config(&dir));

    let outcome = run_captured(&["scanwrap", "test"], &loader);

    assert_eq!(outcome.code, EXIT_CODE_ERROR);
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.contains("proxy port"), "stderr: {}", outcome.stderr);
    assert!(outcome.launched.is_empty());
}

#[test]
fn missing_bundle_is_an_integrity_failure() {
    let dir = TempDir::new().expect("temp dir");
    let config = isolated_config(&dir)
        .with_proxy_port(8080)
        .with_ca_cert(ca_cert_in(&dir));
    let loader = StaticConfigLoader::new(config);

    let outcome = run_captured(&["scanwrap", "test"], &loader);

    assert_eq!(outcome.code, EXIT_CODE_ERROR);
    assert!(
        outcome.stderr.contains("failed to extract legacy binary"),
        "stderr: {}",
        outcome.stderr
    );
    assert!(outcome.launched.is_empty());
}

#[test]
fn loader_receives_only_leading_wrapper_flags() {
    let loader = CapturingLoader {
        seen: RefCell::new(Vec::new()),
    };

    let outcome = run_captured(
        &["scanwrap", "--proxy-port", "8080", "version", "--cache-dir", "/x"],
        &loader,
    );

    assert_eq!(outcome.code, EXIT_CODE_OK);
    assert_eq!(
        loader.seen.into_inner(),
        os_args(&["scanwrap", "--proxy-port", "8080"])
    );
}

#[test]
fn discovered_extension_is_routed_from_config_directories() {
    let dir = TempDir::new().expect("temp dir");
    let extension_dir = dir.path().join("extensions").join("iac");
    fs::create_dir_all(&extension_dir).expect("create extension dir");
    fs::write(
        extension_dir.join("extension.json"),
        r#"{"metadata":{"name":"iac-tool","version":"1.0.0","command":{"name":"iac"}}}"#,
    )
    .expect("write manifest");
    let config = isolated_config(&dir)
        .with_proxy_port(8080)
        .with_ca_cert(ca_cert_in(&dir));
    let loader = StaticConfigLoader::new(config);

    let outcome = run_captured(&["scanwrap", "iac", "--debug"], &loader);

    assert_eq!(outcome.code, EXIT_CODE_OK, "stderr: {}", outcome.stderr);
    assert_eq!(outcome.launched, vec![extension_dir.join("iac")]);
}

#[rstest]
#[case::long(&["test", "--debug"], true)]
#[case::short(&["-d", "test"], true)]
#[case::absent(&["test", "--json"], false)]
fn debug_mode_follows_passthrough_flags(#[case] tokens: &[&str], #[case] expected: bool) {
    let args: Vec<String> = tokens.iter().map(|token| (*token).to_owned()).collect();
    assert_eq!(is_debug(&args), expected);
}

#[cfg(unix)]
#[test]
fn non_unicode_arguments_are_rejected() {
    use std::os::unix::ffi::OsStringExt;

    let error = passthrough_strings(vec![OsString::from_vec(vec![0x66, 0xff])])
        .expect_err("invalid utf-8");
    assert!(matches!(
        error,
        ConfigurationError::NonUnicodeArgument { .. }
    ));
}
