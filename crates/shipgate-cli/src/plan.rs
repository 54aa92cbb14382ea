use anyhow::Result;
use serde_json::{json, Value};

use shipgate_core::{RegistryConfig, Resolver, Tier};

/// Reports, for each credential key a registry requires, whether it would
/// resolve and from which tier. Values are never included.
pub fn run(
    registry_name: &str,
    registry: &RegistryConfig,
    resolver: &Resolver,
    json_output: bool,
) -> Result<()> {
    let report = build_report(registry_name, registry, resolver);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("plan:{registry_name} -> {}", registry.url);
    if let Some(keys) = report["keys"].as_array() {
        for entry in keys {
            println!(
                " - {} ({})",
                entry["key"].as_str().unwrap_or_default(),
                entry["source"].as_str().unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn build_report(registry_name: &str, registry: &RegistryConfig, resolver: &Resolver) -> Value {
    let keys = [registry.username_key.as_str(), registry.token_key.as_str()];
    let entries: Vec<Value> = keys
        .iter()
        .map(|key| {
            let tier = resolver.resolve(key).map(|r| r.tier);
            json!({
                "key": key,
                "source": tier.map_or("unset", Tier::as_str),
            })
        })
        .collect();

    json!({
        "registry": registry_name,
        "url": registry.url,
        "keys": entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipgate_core::MapSource;

    fn registry_fixture() -> RegistryConfig {
        toml::from_str(r#"url = "https://maven.pkg.github.com/acme/demo""#)
            .expect("fixture registry should parse")
    }

    #[test]
    fn report_labels_each_key_with_its_tier() {
        let mut props = MapSource::new();
        props.set("GITHUB_USERNAME", "ci");
        let mut env = MapSource::new();
        env.set("GITHUB_TOKEN", "ghp_secret");
        let resolver = Resolver::new(Box::new(props), Box::new(env));

        let report = build_report("github", &registry_fixture(), &resolver);
        assert_eq!(report["registry"], "github");
        assert_eq!(report["keys"][0]["key"], "GITHUB_USERNAME");
        assert_eq!(report["keys"][0]["source"], "property");
        assert_eq!(report["keys"][1]["source"], "environment");
    }

    #[test]
    fn report_marks_missing_keys_as_unset() {
        let resolver = Resolver::new(Box::new(MapSource::new()), Box::new(MapSource::new()));

        let report = build_report("github", &registry_fixture(), &resolver);
        assert_eq!(report["keys"][0]["source"], "unset");
        assert_eq!(report["keys"][1]["source"], "unset");
    }

    #[test]
    fn report_never_contains_credential_values() {
        let mut props = MapSource::new();
        props.set("GITHUB_USERNAME", "ci-user");
        props.set("GITHUB_TOKEN", "ghp_secret");
        let resolver = Resolver::new(Box::new(props), Box::new(MapSource::new()));

        let rendered = build_report("github", &registry_fixture(), &resolver).to_string();
        assert!(!rendered.contains("ci-user"));
        assert!(!rendered.contains("ghp_secret"));
    }

    #[test]
    fn plan_succeeds_with_unset_keys() {
        let resolver = Resolver::new(Box::new(MapSource::new()), Box::new(MapSource::new()));
        // A report, not a gate: missing keys must not fail the command.
        assert!(run("github", &registry_fixture(), &resolver, false).is_ok());
        assert!(run("github", &registry_fixture(), &resolver, true).is_ok());
    }
}
