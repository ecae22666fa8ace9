//! Extension registry and input protocol for `scanwrap`.
//!
//! Extensions are external executables registered under a command name. When
//! an invocation's first token names an extension, the dispatcher resolves
//! the command path against the [`CommandTree`], encodes an
//! [`ExtensionInput`] document, and writes it to the extension's standard
//! input followed by a blank line.
//!
//! Extensions are discovered once at startup from an extensions directory:
//! each subdirectory holding an `extension.json` manifest contributes one
//! [`Extension`]. The [`ExtensionRegistry`] keeps registration order, and
//! lookups return the first extension whose command name matches.
//!
//! # Example
//!
//! ```
//! use scanwrap_extensions::{
//!     CommandSpec, CommandTree, Extension, ExtensionMetadata, ExtensionRegistry,
//! };
//!
//! let metadata = ExtensionMetadata::new("sbom", "1.0.0", CommandSpec::new("sbom"));
//! let mut registry = ExtensionRegistry::new();
//! registry
//!     .register(Extension::new(metadata, "/opt/ext/sbom/sbom"))
//!     .expect("registration succeeds");
//!
//! let tree = CommandTree::from_registry(&registry);
//! let args = vec!["sbom".to_owned(), "--json".to_owned()];
//! assert!(registry.find_by_command("sbom").is_some());
//! assert_eq!(tree.resolve(&args).expect("resolves"), vec!["sbom"]);
//! ```

pub mod command_tree;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod protocol;
pub mod registry;

#[cfg(test)]
mod tests;

pub use self::command_tree::{CommandNode, CommandTree};
pub use self::discovery::{MANIFEST_FILE_NAME, discover};
pub use self::error::ExtensionError;
pub use self::manifest::{CommandSpec, Extension, ExtensionManifest, ExtensionMetadata};
pub use self::protocol::{ExtensionInput, INPUT_TERMINATOR};
pub use self::registry::ExtensionRegistry;
