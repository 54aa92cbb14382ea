use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::constants::{DEFAULT_TOKEN_KEY, DEFAULT_USERNAME_KEY};

#[derive(Debug, Deserialize)]
pub struct ShipgateConfig {
    pub package: PackageConfig,
    #[serde(default)]
    pub registries: BTreeMap<String, RegistryConfig>,
}

impl ShipgateConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {path}"))?;
        let cfg = toml::from_str::<Self>(&text)
            .with_context(|| format!("failed to parse TOML config: {path}"))?;
        Ok(cfg)
    }

    /// Picks the registry a command targets.
    ///
    /// An explicit selector must name a configured registry. Without a
    /// selector the sole configured registry is used; anything else needs
    /// the caller to disambiguate.
    pub fn select_registry(&self, selector: Option<&str>) -> Result<(&str, &RegistryConfig)> {
        match selector {
            Some(name) => self
                .registries
                .get_key_value(name)
                .map(|(name, registry)| (name.as_str(), registry))
                .ok_or_else(|| {
                    anyhow!(
                        "unknown registry '{}' (configured: {})",
                        name,
                        self.registry_names().join(", ")
                    )
                }),
            None => {
                let mut entries = self.registries.iter();
                match (entries.next(), entries.next()) {
                    (Some((name, registry)), None) => Ok((name.as_str(), registry)),
                    (None, _) => bail!("no registries configured in [registries]"),
                    (Some((first, _)), Some(_)) => bail!(
                        "multiple registries configured ({}): select one, e.g. 'publish:{}'",
                        self.registry_names().join(", "),
                        first
                    ),
                }
            }
        }
    }

    fn registry_names(&self) -> Vec<&str> {
        self.registries.keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct PackageConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub url: String,
    #[serde(default = "default_username_key")]
    pub username_key: String,
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_username_key() -> String {
    DEFAULT_USERNAME_KEY.to_string()
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}
