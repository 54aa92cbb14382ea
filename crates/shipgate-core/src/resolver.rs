use std::fmt;

use tracing::debug;

use crate::source::ValueSource;

/// The tier that supplied a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// The property surface populated from `-D key=value` overrides.
    Property,
    /// The process environment table.
    Environment,
    /// The caller-supplied fallback.
    Default,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Environment => "environment",
            Self::Default => "default",
        }
    }
}

/// A value bound to a key, together with the tier that produced it.
///
/// Resolutions are transient: callers consume them immediately and nothing
/// is cached between lookups, so credentials injected late (for example by
/// a CI job) are observed on the next call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub value: String,
    pub tier: Tier,
}

/// Two-tier key-value resolution: property surface first, then the
/// environment, then an optional caller default.
///
/// A key bound to an empty string is treated exactly like an absent key at
/// every tier, so a defined-but-blank environment variable never masks the
/// fallback chain. Unresolved is a normal outcome, not an error.
pub struct Resolver {
    properties: Box<dyn ValueSource>,
    environment: Box<dyn ValueSource>,
}

impl Resolver {
    pub fn new(properties: Box<dyn ValueSource>, environment: Box<dyn ValueSource>) -> Self {
        Self {
            properties,
            environment,
        }
    }

    /// Effective value for `key` with no fallback default.
    pub fn resolve(&self, key: &str) -> Option<Resolution> {
        self.resolve_or(key, None)
    }

    /// Effective value for `key`, consulting the property surface, then the
    /// environment, then `default`. First non-empty match wins.
    pub fn resolve_or(&self, key: &str, default: Option<&str>) -> Option<Resolution> {
        if let Some(value) = non_empty(self.properties.get(key)) {
            debug!("resolved '{}' from {} tier", key, Tier::Property.as_str());
            return Some(Resolution {
                value,
                tier: Tier::Property,
            });
        }

        if let Some(value) = non_empty(self.environment.get(key)) {
            debug!("resolved '{}' from {} tier", key, Tier::Environment.as_str());
            return Some(Resolution {
                value,
                tier: Tier::Environment,
            });
        }

        let fallback = default.filter(|value| !value.is_empty())?;
        debug!("resolved '{}' from {} tier", key, Tier::Default.as_str());
        Some(Resolution {
            value: fallback.to_string(),
            tier: Tier::Default,
        })
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("properties", &self.properties.name())
            .field("environment", &self.environment.name())
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
