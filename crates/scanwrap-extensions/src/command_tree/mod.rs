//! Command tree used to resolve the command path of an invocation.
//!
//! The tree is assembled once from the registered extensions' command
//! descriptions. Resolution walks the positional tokens of an invocation,
//! descending through matching subcommands. The first positional token must
//! name a top-level command.
//!
//! Flag arity is unknown to the tree, so a separated flag such as
//! `--file value` ends the descent: its value may look like a subcommand.
//! Inline flags (`--org=acme`) carry their value and are skipped.

use crate::error::ExtensionError;
use crate::manifest::CommandSpec;
use crate::registry::ExtensionRegistry;

/// A command and its subcommands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    name: String,
    children: Vec<CommandNode>,
}

impl CommandNode {
    /// Creates a leaf command.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Attaches subcommands.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// Command name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    fn from_spec(spec: &CommandSpec) -> Self {
        Self {
            name: spec.name().to_owned(),
            children: spec.subcommands().iter().map(Self::from_spec).collect(),
        }
    }
}

/// Top-level commands known to the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTree {
    roots: Vec<CommandNode>,
}

impl CommandTree {
    /// Creates a tree from explicit top-level commands.
    #[must_use]
    pub const fn new(roots: Vec<CommandNode>) -> Self {
        Self { roots }
    }

    /// Builds the tree from every registered extension's command.
    #[must_use]
    pub fn from_registry(registry: &ExtensionRegistry) -> Self {
        Self {
            roots: registry
                .iter()
                .map(|extension| CommandNode::from_spec(extension.metadata().command()))
                .collect(),
        }
    }

    /// Top-level commands.
    #[must_use]
    pub fn roots(&self) -> &[CommandNode] {
        &self.roots
    }

    /// Resolves the command path named by `args`.
    ///
    /// Returns the matched command names from the top level downwards.
    /// Flags before the top-level command are skipped; after it, descent
    /// stops at the first flag without an inline value.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::UnresolvedCommand`] when the first
    /// positional token is not a top-level command.
    pub fn resolve(&self, args: &[String]) -> Result<Vec<String>, ExtensionError> {
        let mut tokens = args.iter().skip_while(|arg| is_flag(arg));
        let first = tokens.next().map_or("", String::as_str);

        let mut node = find_child(&self.roots, first).ok_or_else(|| {
            ExtensionError::UnresolvedCommand {
                token: first.to_owned(),
            }
        })?;
        let mut path = vec![node.name.clone()];

        for token in tokens {
            if is_flag(token) {
                if token.contains('=') {
                    continue;
                }
                break;
            }
            match find_child(&node.children, token) {
                Some(child) => {
                    path.push(child.name.clone());
                    node = child;
                }
                None => break,
            }
        }
        Ok(path)
    }
}

fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

fn find_child<'a>(nodes: &'a [CommandNode], name: &str) -> Option<&'a CommandNode> {
    nodes.iter().find(|node| node.name == name)
}
