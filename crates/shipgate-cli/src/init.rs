use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};

use crate::Cli;
use tracing::{info, instrument};

/// Runs the `init` command to bootstrap a new Shipgate project.
#[instrument(skip(cli))]
pub fn run(cli: &Cli, template_selector: Option<&str>) -> Result<()> {
    let template = match template_selector {
        Some(value) => InitTemplate::from_str(value)?,
        None => InitTemplate::Github,
    };

    let config_content = template.render_config();
    write_if_absent(&cli.config, config_content, cli.force)
        .with_context(|| format!("failed to write '{}'", cli.config))?;

    // Round-trip the file we just wrote so a broken template never ships.
    let cfg = shipgate_core::ShipgateConfig::load_from_file(&cli.config)?;

    info!(
        "init complete: template={}, config={}, package={}",
        template.as_str(),
        cli.config,
        cfg.package.name
    );
    println!("next: set the credential keys and run 'sgt check'");

    Ok(())
}

/// Supported registry templates for initialization.
#[derive(Debug, Clone, Copy)]
enum InitTemplate {
    /// GitHub Packages, credential keys defaulted.
    Github,
    /// A generic registry with explicit credential keys.
    Generic,
}

impl InitTemplate {
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "github" => Ok(Self::Github),
            "generic" => Ok(Self::Generic),
            other => Err(anyhow!(
                "unknown init template '{}' (supported: github,generic)",
                other
            )),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Generic => "generic",
        }
    }

    fn render_config(self) -> &'static str {
        match self {
            Self::Github => {
                r#"[package]
name = "my-artifact"
version = "0.1.0"

[registries.github]
url = "https://maven.pkg.github.com/OWNER/REPO"
# username_key and token_key default to GITHUB_USERNAME and GITHUB_TOKEN.
"#
            }
            Self::Generic => {
                r#"[package]
name = "my-artifact"
version = "0.1.0"

[registries.internal]
url = "https://artifacts.example.com/releases"
username_key = "ARTIFACTS_USER"
token_key = "ARTIFACTS_TOKEN"
"#
            }
        }
    }
}

fn write_if_absent(path: &str, content: &str, force: bool) -> Result<()> {
    let output = Path::new(path);

    if output.exists() && !force {
        return Err(anyhow!(
            "'{}' already exists. Re-run with --force to overwrite",
            path
        ));
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }

    fs::write(output, content)
        .with_context(|| format!("failed to write file '{}'", output.display()))
}
