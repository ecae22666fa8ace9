//! Environment variable names read or written by the sanitizer.

/// Identifies the integration driving the legacy binary.
pub const INTEGRATION_NAME: &str = "SCANWRAP_INTEGRATION_NAME";
/// Version of the integration driving the legacy binary.
pub const INTEGRATION_VERSION: &str = "SCANWRAP_INTEGRATION_VERSION";

/// Proxy used for HTTPS traffic.
pub const HTTPS_PROXY: &str = "HTTPS_PROXY";
/// Proxy used for HTTP traffic.
pub const HTTP_PROXY: &str = "HTTP_PROXY";
/// Hosts that bypass the proxy.
pub const NO_PROXY: &str = "NO_PROXY";
/// Proxy used for every protocol.
pub const ALL_PROXY: &str = "ALL_PROXY";
/// Extra certificate authorities trusted by the Node.js runtime.
pub const CA_CERTIFICATE_LOCATION: &str = "NODE_EXTRA_CA_CERTS";
/// npm proxy override.
pub const NPM_PROXY: &str = "NPM_CONFIG_PROXY";
/// npm HTTPS proxy override.
pub const NPM_HTTPS_PROXY: &str = "NPM_CONFIG_HTTPS_PROXY";
/// npm HTTP proxy override.
pub const NPM_HTTP_PROXY: &str = "NPM_CONFIG_HTTP_PROXY";
/// npm proxy bypass list.
pub const NPM_NO_PROXY: &str = "NPM_CONFIG_NO_PROXY";

/// Keys stripped from every child environment, matched ignoring ASCII case.
pub const BLOCKED: &[&str] = &[
    HTTPS_PROXY,
    HTTP_PROXY,
    NO_PROXY,
    ALL_PROXY,
    CA_CERTIFICATE_LOCATION,
    NPM_PROXY,
    NPM_HTTPS_PROXY,
    NPM_HTTP_PROXY,
    NPM_NO_PROXY,
];

/// Keys force-set on every child environment after stripping.
pub const FORCED: &[&str] = &[HTTPS_PROXY, HTTP_PROXY, CA_CERTIFICATE_LOCATION];

/// Returns `true` when `key` names a blocked variable in any letter case.
#[must_use]
pub fn is_blocked(key: &str) -> bool {
    BLOCKED
        .iter()
        .any(|blocked| blocked.eq_ignore_ascii_case(key))
}
