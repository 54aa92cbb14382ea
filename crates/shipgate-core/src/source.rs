use std::collections::HashMap;
use std::env;

/// A read-only key-value surface the resolver can consult.
///
/// The two resolution tiers are injected through this trait instead of
/// being read as ambient process state, so tests can substitute map-backed
/// fakes for both the property surface and the environment table.
pub trait ValueSource {
    /// Short name of the surface, used in trace output.
    fn name(&self) -> &'static str;

    /// Raw lookup. Returns the bound value verbatim, including an empty
    /// string when the key is defined but blank; blank handling is a
    /// resolution rule, not a storage rule.
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment table.
#[derive(Debug, Default)]
pub struct EnvSource;

impl EnvSource {
    pub fn new() -> Self {
        Self
    }
}

impl ValueSource for EnvSource {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// A map-backed surface.
///
/// Holds `-D key=value` overrides in production and doubles as the fake
/// store in resolver and gate tests.
#[derive(Debug, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ValueSource for MapSource {
    fn name(&self) -> &'static str {
        "map"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl FromIterator<(String, String)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
