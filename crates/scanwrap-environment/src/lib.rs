//! Child-process environment construction for `scanwrap`.
//!
//! Every process the dispatcher launches must send its traffic through the
//! local interception proxy. The [`EnvironmentSanitizer`] derives the child
//! environment from the parent's, strips every ambient proxy and certificate
//! variable, and then force-sets the proxy and certificate keys to the
//! interception proxy's values. Nothing from the parent's proxy configuration
//! is ever forwarded passively.
//!
//! ```
//! use scanwrap_environment::{
//!     EnvironmentMap, EnvironmentSanitizer, IntegrationIdentity, InterceptionProxy, keys,
//! };
//!
//! let parent = EnvironmentMap::from_pairs(["PATH=/usr/bin", "HTTPS_PROXY=http://corp:3128"]);
//! let sanitizer = EnvironmentSanitizer::new(
//!     InterceptionProxy::local(8080, "/tmp/ca.pem"),
//!     IntegrationIdentity::new("LEGACY_CLI_PLUGIN", "1.0.0.2.0.0"),
//! );
//! let sanitized = sanitizer.build(parent);
//! assert_eq!(sanitized.env().get(keys::HTTPS_PROXY), Some("http://127.0.0.1:8080"));
//! assert!(sanitized.warning().is_none());
//! ```

pub mod keys;
mod map;
mod sanitizer;

pub use map::EnvironmentMap;
pub use sanitizer::{
    EnvironmentSanitizer, EnvironmentWarning, IntegrationIdentity, InterceptionProxy,
    SanitizedEnvironment,
};
