use thiserror::Error;
use tracing::debug;

use shipgate_core::{RegistryConfig, Resolution, Resolver};

/// Rejection carrying every required key that failed to resolve, in
/// declaration order.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("publish credentials error: missing {} properties", quote_join(.keys))]
pub struct MissingCredentials {
    pub keys: Vec<String>,
}

fn quote_join(keys: &[String]) -> String {
    keys.iter()
        .map(|key| format!("'{key}'"))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Verifies that every required key resolves to a non-empty value.
///
/// Every key is checked before the outcome is decided, so a rejection
/// names the complete set of missing keys in one report instead of
/// stopping at the first failure. On success the resolutions come back in
/// declaration order for the publish action to consume.
pub fn validate(resolver: &Resolver, required: &[&str]) -> Result<Vec<Resolution>, MissingCredentials> {
    let mut resolved = Vec::with_capacity(required.len());
    let mut missing = Vec::new();

    for key in required {
        match resolver.resolve(key) {
            Some(resolution) => resolved.push(resolution),
            None => missing.push((*key).to_string()),
        }
    }

    if missing.is_empty() {
        debug!("gate validated {} keys", resolved.len());
        Ok(resolved)
    } else {
        debug!("gate rejected: {} of {} keys missing", missing.len(), required.len());
        Err(MissingCredentials { keys: missing })
    }
}

/// Gates one registry: resolves its username and token keys, or rejects
/// with both missing names at once.
pub fn validate_registry(
    resolver: &Resolver,
    registry: &RegistryConfig,
) -> Result<(Resolution, Resolution), MissingCredentials> {
    let username = resolver.resolve(&registry.username_key);
    let token = resolver.resolve(&registry.token_key);

    match (username, token) {
        (Some(username), Some(token)) => Ok((username, token)),
        (username, token) => {
            let mut keys = Vec::new();
            if username.is_none() {
                keys.push(registry.username_key.clone());
            }
            if token.is_none() {
                keys.push(registry.token_key.clone());
            }
            Err(MissingCredentials { keys })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipgate_core::{MapSource, Tier};

    fn resolver(properties: &[(&str, &str)], environment: &[(&str, &str)]) -> Resolver {
        let props: MapSource = properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let env: MapSource = environment
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Resolver::new(Box::new(props), Box::new(env))
    }

    fn registry_fixture() -> RegistryConfig {
        toml::from_str(r#"url = "https://maven.pkg.github.com/acme/demo""#)
            .expect("fixture registry should parse")
    }

    #[test]
    fn all_keys_resolved_in_declaration_order() {
        let r = resolver(
            &[("GITHUB_USERNAME", "alice")],
            &[("GITHUB_TOKEN", "ghp_secret")],
        );

        let out = validate(&r, &["GITHUB_USERNAME", "GITHUB_TOKEN"]).expect("gate should pass");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].value, "alice");
        assert_eq!(out[0].tier, Tier::Property);
        assert_eq!(out[1].value, "ghp_secret");
        assert_eq!(out[1].tier, Tier::Environment);
    }

    #[test]
    fn rejection_names_only_the_missing_key() {
        let r = resolver(&[("GITHUB_USERNAME", "alice")], &[]);

        let err = validate(&r, &["GITHUB_USERNAME", "GITHUB_TOKEN"]).expect_err("gate must reject");
        assert_eq!(err.keys, vec!["GITHUB_TOKEN".to_string()]);

        let message = err.to_string();
        assert!(message.contains("'GITHUB_TOKEN'"));
        assert!(!message.contains("'GITHUB_USERNAME'"));
    }

    #[test]
    fn rejection_names_every_missing_key_in_one_message() {
        let r = resolver(&[], &[]);

        let err = validate(&r, &["GITHUB_USERNAME", "GITHUB_TOKEN"]).expect_err("gate must reject");
        assert_eq!(
            err.to_string(),
            "publish credentials error: missing 'GITHUB_USERNAME' and 'GITHUB_TOKEN' properties"
        );
    }

    #[test]
    fn no_early_exit_on_first_failure() {
        let r = resolver(&[("B", "present")], &[]);

        let err = validate(&r, &["A", "B", "C"]).expect_err("gate must reject");
        assert_eq!(err.keys, vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let r = resolver(&[("GITHUB_USERNAME", "")], &[("GITHUB_TOKEN", "")]);

        let err = validate(&r, &["GITHUB_USERNAME", "GITHUB_TOKEN"]).expect_err("gate must reject");
        assert_eq!(err.keys.len(), 2);
    }

    #[test]
    fn registry_gate_yields_username_and_token() {
        let r = resolver(
            &[("GITHUB_USERNAME", "alice"), ("GITHUB_TOKEN", "ghp_secret")],
            &[],
        );

        let (username, token) =
            validate_registry(&r, &registry_fixture()).expect("gate should pass");
        assert_eq!(username.value, "alice");
        assert_eq!(token.value, "ghp_secret");
    }

    #[test]
    fn registry_gate_rejects_with_both_default_keys() {
        let r = resolver(&[], &[]);

        let err = validate_registry(&r, &registry_fixture()).expect_err("gate must reject");
        assert_eq!(
            err.keys,
            vec!["GITHUB_USERNAME".to_string(), "GITHUB_TOKEN".to_string()]
        );
    }

    #[test]
    fn publish_action_runs_only_after_validation() {
        let rejected = resolver(&[], &[]);
        let validated = resolver(&[("GITHUB_USERNAME", "alice"), ("GITHUB_TOKEN", "t")], &[]);
        let keys = ["GITHUB_USERNAME", "GITHUB_TOKEN"];

        let mut invocations = 0;
        if validate(&rejected, &keys).is_ok() {
            invocations += 1;
        }
        assert_eq!(invocations, 0);

        if validate(&validated, &keys).is_ok() {
            invocations += 1;
        }
        assert_eq!(invocations, 1);
    }
}
