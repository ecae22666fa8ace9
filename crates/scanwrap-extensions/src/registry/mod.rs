//! Ordered extension registry.
//!
//! The [`ExtensionRegistry`] keeps extensions in registration order. Command
//! names are not required to be unique; lookups return the first match.

use tracing::warn;

use crate::error::ExtensionError;
use crate::manifest::Extension;

const REGISTRY_TARGET: &str = "scanwrap_extensions::registry";

/// Registry of installed extensions.
///
/// # Example
///
/// ```
/// use scanwrap_extensions::{CommandSpec, Extension, ExtensionMetadata, ExtensionRegistry};
///
/// let mut registry = ExtensionRegistry::new();
/// let meta = ExtensionMetadata::new("sbom", "1.0.0", CommandSpec::new("sbom"));
/// registry
///     .register(Extension::new(meta, "/opt/ext/sbom/sbom"))
///     .expect("registration succeeds");
/// assert!(registry.find_by_command("sbom").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Extension>,
}

impl ExtensionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension after validation.
    ///
    /// A second extension claiming an already registered command name is
    /// accepted but shadowed by the first.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Manifest`] if validation fails.
    pub fn register(&mut self, extension: Extension) -> Result<(), ExtensionError> {
        extension.validate()?;
        if let Some(existing) = self.find_by_command(extension.command_name()) {
            warn!(
                target: REGISTRY_TARGET,
                command = extension.command_name(),
                shadowed_by = existing.metadata().name(),
                extension = extension.metadata().name(),
                "extension command already registered; later registration is shadowed"
            );
        }
        self.extensions.push(extension);
        Ok(())
    }

    /// Returns the first extension registered under `command`.
    #[must_use]
    pub fn find_by_command(&self, command: &str) -> Option<&Extension> {
        self.extensions
            .iter()
            .find(|extension| extension.command_name() == command)
    }

    /// Iterates over extensions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter()
    }

    /// Returns the number of registered extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Returns `true` when no extensions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}
