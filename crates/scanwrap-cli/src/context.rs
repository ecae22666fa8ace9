//! Everything one invocation needs, gathered once at startup.

use camino::{Utf8Path, Utf8PathBuf};
use scanwrap_config::{Config, ConfigError};
use scanwrap_environment::{EnvironmentMap, IntegrationIdentity, InterceptionProxy};
use scanwrap_extensions::{CommandTree, ExtensionRegistry, discover};
use scanwrap_integrity::{BundleExtractor, IntegrityRecord, LegacyRelease};
use tracing::{debug, warn};

use crate::errors::ConfigurationError;

const CONTEXT_TARGET: &str = "scanwrap_cli::context";

/// Integration name announced to the legacy binary and extensions.
pub(crate) const INTEGRATION_NAME: &str = "LEGACY_CLI_PLUGIN";

/// Version strings of the wrapper and the wrapped legacy binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Versions {
    wrapper: String,
    legacy: String,
}

impl Versions {
    pub(crate) fn new(wrapper: impl Into<String>, legacy: impl Into<String>) -> Self {
        Self {
            wrapper: wrapper.into(),
            legacy: legacy.into(),
        }
    }

    pub(crate) fn current() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"), LegacyRelease::current().version())
    }

    /// Displayed version, `<wrapper>.<legacy>`.
    pub(crate) fn display(&self) -> String {
        format!("{}.{}", self.wrapper, self.legacy)
    }

    pub(crate) fn integration_identity(&self) -> IntegrationIdentity {
        IntegrationIdentity::new(INTEGRATION_NAME, self.display())
    }
}

/// Cached legacy binary together with the bundle it is restored from.
#[derive(Debug, Clone)]
pub(crate) struct LegacyBinary {
    record: IntegrityRecord,
    extractor: BundleExtractor,
}

impl LegacyBinary {
    pub(crate) const fn new(record: IntegrityRecord, extractor: BundleExtractor) -> Self {
        Self { record, extractor }
    }

    fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let release = LegacyRelease::current();
        let cache_dir = config.cache_dir()?;
        let bundle = config.legacy_bundle()?;
        Ok(Self::new(
            IntegrityRecord::new(release.cache_path(&cache_dir), release.sha256()),
            BundleExtractor::new(bundle),
        ))
    }

    pub(crate) const fn record(&self) -> &IntegrityRecord {
        &self.record
    }

    pub(crate) const fn extractor(&self) -> &BundleExtractor {
        &self.extractor
    }
}

/// Explicit dispatch inputs; the dispatcher reads no process state itself.
#[derive(Debug)]
pub(crate) struct DispatchContext {
    versions: Versions,
    registry: ExtensionRegistry,
    command_tree: CommandTree,
    legacy: Result<LegacyBinary, String>,
    proxy_port: Option<u16>,
    ca_cert: Option<Utf8PathBuf>,
    parent_env: EnvironmentMap,
    debug: bool,
}

impl DispatchContext {
    pub(crate) fn new(
        versions: Versions,
        registry: ExtensionRegistry,
        parent_env: EnvironmentMap,
    ) -> Self {
        let command_tree = CommandTree::from_registry(&registry);
        Self {
            versions,
            registry,
            command_tree,
            legacy: Err(ConfigError::MissingLegacyBundle.to_string()),
            proxy_port: None,
            ca_cert: None,
            parent_env,
            debug: false,
        }
    }

    /// Builds the context for a real invocation.
    ///
    /// Extension discovery problems are logged and leave the registry
    /// empty so the legacy path stays available.
    pub(crate) fn from_config(config: &Config, debug: bool) -> Self {
        let registry = load_extensions(config);
        let mut context = Self::new(Versions::current(), registry, EnvironmentMap::capture())
            .with_debug(debug);
        context.legacy = LegacyBinary::from_config(config).map_err(|error| error.to_string());
        context.proxy_port = config.proxy_port();
        context.ca_cert = config.ca_cert().map(Utf8Path::to_path_buf);
        context
    }

    #[cfg(test)]
    pub(crate) fn with_legacy(mut self, legacy: LegacyBinary) -> Self {
        self.legacy = Ok(legacy);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_proxy(mut self, port: u16, ca_cert: impl Into<Utf8PathBuf>) -> Self {
        self.proxy_port = Some(port);
        self.ca_cert = Some(ca_cert.into());
        self
    }

    pub(crate) const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub(crate) const fn versions(&self) -> &Versions {
        &self.versions
    }

    pub(crate) const fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub(crate) const fn command_tree(&self) -> &CommandTree {
        &self.command_tree
    }

    pub(crate) const fn parent_env(&self) -> &EnvironmentMap {
        &self.parent_env
    }

    pub(crate) const fn debug(&self) -> bool {
        self.debug
    }

    pub(crate) fn proxy_port(&self) -> Result<u16, ConfigurationError> {
        self.proxy_port.ok_or(ConfigurationError::MissingProxyPort)
    }

    /// Interception proxy for child environments.
    pub(crate) fn interception_proxy(&self) -> Result<InterceptionProxy, ConfigurationError> {
        let port = self.proxy_port()?;
        let ca_cert = self
            .ca_cert
            .as_deref()
            .ok_or(ConfigurationError::MissingCaCert)?;
        Ok(InterceptionProxy::local(port, ca_cert.as_str()))
    }

    pub(crate) fn legacy(&self) -> Result<&LegacyBinary, ConfigurationError> {
        self.legacy
            .as_ref()
            .map_err(|reason| ConfigurationError::LegacyLocation {
                reason: reason.clone(),
            })
    }
}

fn load_extensions(config: &Config) -> ExtensionRegistry {
    let directory = match config.extensions_dir() {
        Ok(directory) => directory,
        Err(error) => {
            debug!(target: CONTEXT_TARGET, %error, "no extensions directory available");
            return ExtensionRegistry::new();
        }
    };

    match discover(&directory) {
        Ok(registry) => registry,
        Err(error) => {
            warn!(
                target: CONTEXT_TARGET,
                path = %directory.display(),
                %error,
                "extension discovery failed"
            );
            ExtensionRegistry::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displayed_version_joins_wrapper_and_legacy() {
        let versions = Versions::new("2.1.0", "1.1000.0");
        assert_eq!(versions.display(), "2.1.0.1.1000.0");
    }

    #[test]
    fn integration_identity_uses_displayed_version() {
        let identity = Versions::new("2.0.0", "1.9.0").integration_identity();
        assert_eq!(identity.name(), INTEGRATION_NAME);
        assert_eq!(identity.version(), "2.0.0.1.9.0");
    }

    #[test]
    fn missing_proxy_settings_are_configuration_errors() {
        let context = DispatchContext::new(
            Versions::new("2.0.0", "1.0.0"),
            ExtensionRegistry::new(),
            EnvironmentMap::new(),
        );
        assert!(matches!(
            context.proxy_port(),
            Err(ConfigurationError::MissingProxyPort)
        ));
        assert!(matches!(
            context.legacy(),
            Err(ConfigurationError::LegacyLocation { .. })
        ));
    }

    #[test]
    fn proxy_without_certificate_is_rejected() {
        let mut context = DispatchContext::new(
            Versions::new("2.0.0", "1.0.0"),
            ExtensionRegistry::new(),
            EnvironmentMap::new(),
        );
        context.proxy_port = Some(8080);
        assert!(matches!(
            context.interception_proxy(),
            Err(ConfigurationError::MissingCaCert)
        ));
    }

    #[test]
    fn configured_proxy_points_at_loopback() {
        let context = DispatchContext::new(
            Versions::new("2.0.0", "1.0.0"),
            ExtensionRegistry::new(),
            EnvironmentMap::new(),
        )
        .with_proxy(8080, "/tmp/ca.pem");
        let proxy = context.interception_proxy().expect("proxy configured");
        assert_eq!(proxy.address(), "http://127.0.0.1:8080");
        assert_eq!(proxy.ca_cert(), "/tmp/ca.pem");
    }
}
