//! Extension identity, command description, and on-disk manifest types.
//!
//! An [`ExtensionMetadata`] is echoed back to the extension verbatim inside
//! every [`ExtensionInput`](crate::ExtensionInput), so fields this crate does
//! not model are preserved in [`ExtensionMetadata::extra`] and serialised
//! back in key order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExtensionError;

/// Command exposed by an extension, with optional nested subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subcommands: Vec<CommandSpec>,
}

impl CommandSpec {
    /// Creates a command without description or subcommands.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            subcommands: Vec::new(),
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares nested subcommands.
    #[must_use]
    pub fn with_subcommands(mut self, subcommands: Vec<Self>) -> Self {
        self.subcommands = subcommands;
        self
    }

    /// Command name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Command description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Nested subcommands.
    #[must_use]
    pub fn subcommands(&self) -> &[Self] {
        &self.subcommands
    }
}

/// Identity of an extension as declared by its author.
///
/// # Example
///
/// ```
/// use scanwrap_extensions::{CommandSpec, ExtensionMetadata};
///
/// let meta = ExtensionMetadata::new("sbom", "1.0.0", CommandSpec::new("sbom"));
/// assert_eq!(meta.command().name(), "sbom");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionMetadata {
    name: String,
    version: String,
    command: CommandSpec,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl ExtensionMetadata {
    /// Creates metadata with no extra fields.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>, command: CommandSpec) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            command,
            extra: serde_json::Map::new(),
        }
    }

    /// Adds an author-defined field that is echoed back unchanged.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Extension name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Extension version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Top-level command served by the extension.
    #[must_use]
    pub const fn command(&self) -> &CommandSpec {
        &self.command
    }

    /// Author-defined fields not modelled by this crate.
    #[must_use]
    pub const fn extra(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.extra
    }
}

/// Contents of an `extension.json` file.
///
/// `binary` names the executable inside the extension directory and defaults
/// to the directory name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    binary: Option<String>,
    metadata: ExtensionMetadata,
}

impl ExtensionManifest {
    /// Creates a manifest.
    #[must_use]
    pub const fn new(metadata: ExtensionMetadata, binary: Option<String>) -> Self {
        Self { binary, metadata }
    }

    /// Explicit executable file name, if declared.
    #[must_use]
    pub fn binary(&self) -> Option<&str> {
        self.binary.as_deref()
    }

    /// Declared metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    /// Turns the manifest into an [`Extension`] rooted at `directory`.
    #[must_use]
    pub fn into_extension(self, directory: &Path) -> Extension {
        let binary = match self.binary {
            Some(binary) => directory.join(binary),
            None => {
                let fallback = directory.file_name().unwrap_or(directory.as_os_str());
                directory.join(fallback)
            }
        };
        Extension::new(self.metadata, binary)
    }
}

/// A registered extension: command name, executable, and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    binary_path: PathBuf,
    metadata: ExtensionMetadata,
}

impl Extension {
    /// Creates an extension from its metadata and executable path.
    #[must_use]
    pub fn new(metadata: ExtensionMetadata, binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            metadata,
        }
    }

    /// Validates the extension.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Manifest`] if the command name is blank or
    /// the executable path is empty.
    pub fn validate(&self) -> Result<(), ExtensionError> {
        if self.command_name().trim().is_empty() {
            return Err(ExtensionError::Manifest {
                message: format!(
                    "extension '{}' must declare a command name",
                    self.metadata.name()
                ),
            });
        }
        if self.binary_path.as_os_str().is_empty() {
            return Err(ExtensionError::Manifest {
                message: format!(
                    "extension '{}' must declare an executable",
                    self.metadata.name()
                ),
            });
        }
        Ok(())
    }

    /// Command name used as the routing key.
    #[must_use]
    pub const fn command_name(&self) -> &str {
        self.metadata.command().name()
    }

    /// Path to the extension executable.
    #[must_use]
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Declared metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }
}
