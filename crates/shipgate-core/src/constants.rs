//! Constants used across the Shipgate workspace.

/// The filename for Shipgate's primary configuration.
pub const CONFIG_FILE: &str = "shipgate.toml";

/// Credential key consulted for the registry username unless overridden.
pub const DEFAULT_USERNAME_KEY: &str = "GITHUB_USERNAME";

/// Credential key consulted for the registry token unless overridden.
pub const DEFAULT_TOKEN_KEY: &str = "GITHUB_TOKEN";
