use rstest::{fixture, rstest};
use scanwrap_extensions::{CommandNode, CommandSpec, ExtensionMetadata};

use super::*;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn extension(name: &str, command: CommandSpec) -> Extension {
    Extension::new(
        ExtensionMetadata::new(name, "1.0.0", command),
        format!("/opt/extensions/{name}/{name}"),
    )
}

#[fixture]
fn registry() -> ExtensionRegistry {
    let mut registry = ExtensionRegistry::new();
    registry
        .register(extension(
            "iac-tool",
            CommandSpec::new("iac").with_subcommands(vec![CommandSpec::new("test")]),
        ))
        .expect("register iac");
    registry
        .register(extension("shadow", CommandSpec::new("iac")))
        .expect("register shadow");
    registry
}

#[rstest]
fn version_wins_over_extension_match(registry: ExtensionRegistry) {
    let tree = CommandTree::from_registry(&registry);
    let route = route(&args(&["iac", "test", "--version"]), &registry, &tree).expect("routes");
    assert_eq!(route, Route::Builtin(BuiltinHandler::Version));
}

#[rstest]
fn first_registered_extension_wins(registry: ExtensionRegistry) {
    let tree = CommandTree::from_registry(&registry);
    let route = route(&args(&["iac", "test", "./infra"]), &registry, &tree).expect("routes");
    match route {
        Route::Extension {
            extension,
            matched_command_path,
        } => {
            assert_eq!(extension.metadata().name(), "iac-tool");
            assert_eq!(matched_command_path, args(&["iac", "test"]));
        }
        other => panic!("expected extension route, got {other:?}"),
    }
}

#[rstest]
fn leading_flags_do_not_hide_the_command(registry: ExtensionRegistry) {
    let tree = CommandTree::from_registry(&registry);
    let route = route(&args(&["--debug", "iac"]), &registry, &tree).expect("routes");
    assert_eq!(route.name(), "extension");
}

#[rstest]
#[case::unknown_command(&["test", "--all-projects"])]
#[case::no_arguments(&[])]
#[case::only_flags(&["--json"])]
#[case::command_in_second_position(&["test", "iac"])]
fn unmatched_invocations_fall_back_to_legacy(
    registry: ExtensionRegistry,
    #[case] tokens: &[&str],
) {
    let tree = CommandTree::from_registry(&registry);
    let route = route(&args(tokens), &registry, &tree).expect("routes");
    assert_eq!(route, Route::LegacyFallback);
}

#[rstest]
fn unresolvable_extension_command_is_fatal(registry: ExtensionRegistry) {
    let tree = CommandTree::new(vec![CommandNode::new("other")]);
    let error = route(&args(&["iac"]), &registry, &tree).expect_err("must fail");
    assert!(matches!(error, ConfigurationError::UnresolvedCommand(_)));
}
