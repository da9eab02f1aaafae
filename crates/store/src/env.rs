//! Read-only environment sources consulted ahead of the store.
//!
//! Responsibilities:
//! - Define the `EnvSource` trait the store queries on every `get`.
//! - Provide `ProcessEnv` (the real process environment) and `StaticEnv`
//!   (a fixed map for tests and embedding).
//!
//! Does NOT handle:
//! - Precedence logic (the store decides when to consult the source).
//! - Mutation of the process environment.
//!
//! Invariants:
//! - Lookups are by exact key: case-sensitive, no trimming.
//! - An entry whose value is the empty string is present, not absent.

use std::collections::BTreeMap;

/// A read-only string-to-string lookup consulted before the store mapping.
///
/// Entries from the source always win precedence over store entries of the
/// same key. Injecting the source keeps the store testable without mutating
/// real process state.
pub trait EnvSource: Send + Sync {
    /// Look up `key` exactly as given. `None` means absent; an empty string
    /// value means present.
    fn get(&self, key: &str) -> Option<String>;
}

/// The ambient process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed environment built from an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: BTreeMap<String, String>,
}

impl StaticEnv {
    /// An environment with no entries.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for StaticEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn process_env_is_exact_match_and_keeps_empty_values() {
        let key = "_ENVSTORE_TEST_PROCESS_ENV";
        temp_env::with_vars([(key, Some("value"))], || {
            assert_eq!(ProcessEnv.get(key), Some("value".to_string()));
            // Lookup is case-sensitive.
            assert_eq!(ProcessEnv.get(&key.to_lowercase()), None);
        });

        // Empty string counts as present.
        temp_env::with_vars([(key, Some(""))], || {
            assert_eq!(ProcessEnv.get(key), Some(String::new()));
        });

        assert_eq!(ProcessEnv.get(key), None);
    }

    #[test]
    fn static_env_builds_from_pairs() {
        let env: StaticEnv = [("PATH", "/usr/bin"), ("HOME", "/root")]
            .into_iter()
            .collect();
        assert_eq!(env.get("PATH"), Some("/usr/bin".to_string()));
        assert_eq!(env.get("path"), None);
        assert_eq!(StaticEnv::empty().get("PATH"), None);
    }
}
