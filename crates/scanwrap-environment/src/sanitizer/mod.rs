//! Builds child environments that route through the interception proxy.

use std::fmt;

use tracing::debug;

use crate::keys;
use crate::map::EnvironmentMap;

const SANITIZER_TARGET: &str = "scanwrap_environment::sanitizer";

/// Address and certificate of the local interception proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptionProxy {
    address: String,
    ca_cert: String,
}

impl InterceptionProxy {
    /// Creates a proxy description for `http://127.0.0.1:<port>`.
    ///
    /// The certificate path is exported exactly as given.
    #[must_use]
    pub fn local(port: u16, ca_cert: impl Into<String>) -> Self {
        Self {
            address: format!("http://127.0.0.1:{port}"),
            ca_cert: ca_cert.into(),
        }
    }

    /// Proxy URL injected as the HTTP and HTTPS proxy.
    #[must_use]
    pub const fn address(&self) -> &str {
        self.address.as_str()
    }

    /// Certificate authority path injected for the child runtime.
    #[must_use]
    pub const fn ca_cert(&self) -> &str {
        self.ca_cert.as_str()
    }
}

/// Name and version identifying the integration that launched the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationIdentity {
    name: String,
    version: String,
}

impl IntegrationIdentity {
    /// Creates an identity.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Integration name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Integration version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }
}

/// Non-fatal notice that only one integration identifier was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentWarning {
    message: String,
}

impl EnvironmentWarning {
    fn partial_integration() -> Self {
        Self {
            message: format!(
                "Partially defined environment, please ensure to provide both {} and {} together!",
                keys::INTEGRATION_NAME,
                keys::INTEGRATION_VERSION
            ),
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl fmt::Display for EnvironmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of sanitisation: the child environment and an optional warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedEnvironment {
    env: EnvironmentMap,
    warning: Option<EnvironmentWarning>,
}

impl SanitizedEnvironment {
    /// The environment to hand to the child.
    #[must_use]
    pub const fn env(&self) -> &EnvironmentMap {
        &self.env
    }

    /// Warning raised while building the environment, if any.
    #[must_use]
    pub const fn warning(&self) -> Option<&EnvironmentWarning> {
        self.warning.as_ref()
    }

    /// Splits the result into its parts.
    #[must_use]
    pub fn into_parts(self) -> (EnvironmentMap, Option<EnvironmentWarning>) {
        (self.env, self.warning)
    }
}

/// Derives child environments from the parent's.
///
/// Sanitisation never fails. The steps run in a fixed order:
///
/// 1. fill in the integration identifiers when both are absent, or warn when
///    exactly one is present;
/// 2. strip every key in [`keys::BLOCKED`], ignoring ASCII case;
/// 3. force-set [`keys::FORCED`] to the interception proxy's values.
#[derive(Debug, Clone)]
pub struct EnvironmentSanitizer {
    proxy: InterceptionProxy,
    identity: IntegrationIdentity,
}

impl EnvironmentSanitizer {
    /// Creates a sanitizer for the given proxy and integration identity.
    #[must_use]
    pub const fn new(proxy: InterceptionProxy, identity: IntegrationIdentity) -> Self {
        Self { proxy, identity }
    }

    /// Builds the child environment from `parent`.
    #[must_use]
    pub fn build(&self, mut parent: EnvironmentMap) -> SanitizedEnvironment {
        let warning = self.apply_identity(&mut parent);

        let removed = parent.remove_where(keys::is_blocked);
        if !removed.is_empty() {
            debug!(
                target: SANITIZER_TARGET,
                removed = ?removed,
                "stripped ambient proxy configuration"
            );
        }

        parent.insert(keys::HTTPS_PROXY, self.proxy.address());
        parent.insert(keys::HTTP_PROXY, self.proxy.address());
        parent.insert(keys::CA_CERTIFICATE_LOCATION, self.proxy.ca_cert());

        SanitizedEnvironment {
            env: parent,
            warning,
        }
    }

    fn apply_identity(&self, env: &mut EnvironmentMap) -> Option<EnvironmentWarning> {
        let has_name = env.contains_key(keys::INTEGRATION_NAME);
        let has_version = env.contains_key(keys::INTEGRATION_VERSION);

        match (has_name, has_version) {
            (false, false) => {
                env.insert(keys::INTEGRATION_NAME, self.identity.name());
                env.insert(keys::INTEGRATION_VERSION, self.identity.version());
                None
            }
            (true, true) => None,
            _ => {
                let warning = EnvironmentWarning::partial_integration();
                debug!(target: SANITIZER_TARGET, "{warning}");
                Some(warning)
            }
        }
    }
}
