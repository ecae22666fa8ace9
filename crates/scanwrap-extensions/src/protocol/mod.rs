//! Input document written to an extension's standard input.
//!
//! The dispatcher writes exactly one JSON document followed by a blank line
//! ([`INPUT_TERMINATOR`]) and then closes the stream. Field order is fixed by
//! the struct declaration so the encoded bytes are reproducible.

use serde::{Deserialize, Serialize};

use crate::error::ExtensionError;
use crate::manifest::ExtensionMetadata;

/// Bytes written after the document so line-oriented readers see a blank line.
pub const INPUT_TERMINATOR: &[u8] = b"\n\n";

/// Payload handed to an extension for one invocation.
///
/// # Example
///
/// ```
/// use scanwrap_extensions::{CommandSpec, ExtensionInput, ExtensionMetadata};
///
/// let meta = ExtensionMetadata::new("sbom", "1.0.0", CommandSpec::new("sbom"));
/// let input = ExtensionInput::new(
///     meta,
///     vec!["sbom".into()],
///     vec!["sbom".into(), "--json".into()],
///     false,
///     8080,
/// );
/// let bytes = input.encode().expect("encodes");
/// assert!(bytes.ends_with(b"}\n\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionInput {
    metadata: ExtensionMetadata,
    matched_command_path: Vec<String>,
    args: Vec<String>,
    debug: bool,
    proxy_port: u16,
}

impl ExtensionInput {
    /// Creates the input for one invocation.
    #[must_use]
    pub const fn new(
        metadata: ExtensionMetadata,
        matched_command_path: Vec<String>,
        args: Vec<String>,
        debug: bool,
        proxy_port: u16,
    ) -> Self {
        Self {
            metadata,
            matched_command_path,
            args,
            debug,
            proxy_port,
        }
    }

    /// Serialises the document and appends [`INPUT_TERMINATOR`].
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::SerializeInput`] if serialisation fails.
    pub fn encode(&self) -> Result<Vec<u8>, ExtensionError> {
        let mut bytes = serde_json::to_vec(self).map_err(ExtensionError::SerializeInput)?;
        bytes.extend_from_slice(INPUT_TERMINATOR);
        Ok(bytes)
    }

    /// Echoed extension metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    /// Resolved command path.
    #[must_use]
    pub fn matched_command_path(&self) -> &[String] {
        &self.matched_command_path
    }

    /// Verbatim invocation arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether the invocation runs in debug mode.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Port of the interception proxy the extension must use.
    #[must_use]
    pub const fn proxy_port(&self) -> u16 {
        self.proxy_port
    }
}
