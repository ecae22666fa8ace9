//! Crate-level tests exercising discovery, routing, and encoding together.

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use crate::command_tree::CommandTree;
use crate::discovery::{MANIFEST_FILE_NAME, discover};
use crate::protocol::ExtensionInput;

#[test]
fn discovered_extension_round_trips_into_input_document() {
    let dir = TempDir::new().expect("temp dir");
    let extension_dir = dir.path().join("iac");
    fs::create_dir_all(&extension_dir).expect("create extension dir");
    let manifest = json!({
        "binary": "iac-linux",
        "metadata": {
            "name": "iac-tool",
            "version": "2.1.0",
            "command": {"name": "iac", "subcommands": [{"name": "test"}]},
            "owner": "platform-security",
        }
    });
    fs::write(
        extension_dir.join(MANIFEST_FILE_NAME),
        serde_json::to_vec(&manifest).expect("serialise"),
    )
    .expect("write manifest");

    let registry = discover(dir.path()).expect("discover");
    let tree = CommandTree::from_registry(&registry);
    let args: Vec<String> = vec!["iac".into(), "test".into(), "./infra".into()];
    let extension = registry.find_by_command("iac").expect("iac registered");
    let path = tree.resolve(&args).expect("resolve");

    let input = ExtensionInput::new(extension.metadata().clone(), path, args.clone(), false, 9000);
    let bytes = input.encode().expect("encode");
    let document: serde_json::Value =
        serde_json::from_slice(bytes.trim_ascii_end()).expect("parse document");

    assert_eq!(document["metadata"], manifest["metadata"]);
    assert_eq!(document["matchedCommandPath"], json!(["iac", "test"]));
    assert_eq!(document["args"], json!(args));
    assert_eq!(document["proxyPort"], json!(9000));
    assert_eq!(
        extension.binary_path(),
        extension_dir.join("iac-linux")
    );
}
