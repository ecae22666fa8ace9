//! Deterministic environment variable map.

use std::collections::BTreeMap;
use std::env;

use tracing::debug;

const MAP_TARGET: &str = "scanwrap_environment::map";

/// Mapping from variable name to value with unique keys.
///
/// Entries are kept sorted by key so [`EnvironmentMap::to_pairs`] is
/// reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    vars: BTreeMap<String, String>,
}

impl EnvironmentMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a flat `KEY=VALUE` list; the last duplicate wins.
    ///
    /// The value is everything after the first `=`. Entries without a `=`
    /// or with an empty key are skipped.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for pair in pairs {
            match pair.as_ref().split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    map.insert(key, value);
                }
                _ => {
                    debug!(target: MAP_TARGET, "skipping malformed environment entry");
                }
            }
        }
        map
    }

    /// Captures the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn capture() -> Self {
        let mut map = Self::new();
        for (key, value) in env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    map.insert(key, value);
                }
                (Ok(key), Err(_)) => {
                    debug!(target: MAP_TARGET, %key, "skipping non-unicode environment value");
                }
                (Err(_), _) => {
                    debug!(target: MAP_TARGET, "skipping non-unicode environment key");
                }
            }
        }
        map
    }

    /// Inserts or replaces a variable, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(key.into(), value.into())
    }

    /// Looks up a variable by its exact name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Returns `true` when a variable with the exact name is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Removes every variable for which `predicate` returns `true`.
    ///
    /// Returns the removed keys in sorted order.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let removed: Vec<String> = self
            .vars
            .keys()
            .filter(|key| predicate(key.as_str()))
            .cloned()
            .collect();
        for key in &removed {
            self.vars.remove(key);
        }
        removed
    }

    /// Iterates over the variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Serialises the map back into sorted `KEY=VALUE` entries.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<String> {
        self.iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` when the map holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvironmentMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
