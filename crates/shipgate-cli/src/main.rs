use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use shipgate_core::constants::CONFIG_FILE;
use shipgate_core::{CommandRef, EnvSource, MapSource, PrimaryCommand, Resolver, ShipgateConfig};
use shipgate_registry::Credentials;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod init;
mod plan;
mod styles;

#[allow(unused_imports)]
use styles as s;

/// The command-line interface for Shipgate.
#[derive(Debug, Parser)]
#[command(name = "sgt")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(
    help_template = "{bin} {version}\n\n{about-with-newline}{usage-heading} {usage}\n\n{all-args}{after-help}"
)]
#[command(about = "Publish preflight and credential gating")]
#[command(
    long_about = "Shipgate guards artifact publication. It resolves the credentials a
registry requires from -D overrides with an environment fallback, and it
refuses to start an upload until every required value is present, naming
everything that is missing in one report.

Common Commands:
  init              Initialize a new shipgate.toml in the current directory
  check             Validate publish credentials for the configured registry
  plan              Show where each required credential would resolve from
  publish           Validate, then upload --artifact to the registry
"
)]
#[command(
    after_help = "\x1b[1;32mExamples:\x1b[0m\n  \x1b[36msgt init\x1b[0m                          \x1b[2m# Bootstrap a shipgate.toml\x1b[0m\n  \x1b[36msgt check\x1b[0m                         \x1b[2m# Preflight the sole configured registry\x1b[0m\n  \x1b[36msgt plan --json\x1b[0m                   \x1b[2m# Machine-readable credential report\x1b[0m\n  \x1b[36msgt publish --artifact out.jar\x1b[0m    \x1b[2m# Gate, then upload\x1b[0m\n  \x1b[36msgt publish:github -D GITHUB_USERNAME=ci --artifact out.jar\x1b[0m\n\n\x1b[1;32mGitHub Repository:\x1b[0m https://github.com/shipgate/shipgate"
)]
pub(crate) struct Cli {
    /// Command in canonical form, for example: `check`, `publish:github`
    command: Option<String>,
    /// Optional selector naming a registry (supports `sgt publish github` style)
    selector: Option<String>,
    /// Path to shipgate config file.
    #[arg(long, default_value = CONFIG_FILE)]
    config: String,
    /// Property override, repeatable: -D KEY=VALUE. Wins over the environment.
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    define: Vec<String>,
    /// Artifact to upload with `publish`.
    #[arg(long)]
    artifact: Option<PathBuf>,
    /// Resolve and validate, but skip the upload.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Emit the `plan` report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Overwrite generated files if they already exist.
    #[arg(long, default_value_t = false)]
    force: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    let command_name = match &cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!(); // Add a newline after help
            return Ok(());
        }
    };

    let command_text = match &cli.selector {
        Some(selector) => format!("{}:{}", command_name, selector),
        None => command_name.clone(),
    };

    let command = CommandRef::from_str(&command_text)
        .map_err(|e| anyhow!("failed to parse command '{}': {e}", command_text))?;

    if command.primary == PrimaryCommand::Init {
        return init::run(&cli, command.selector.as_deref());
    }

    let cfg = ShipgateConfig::load_from_file(&cli.config)
        .with_context(|| format!("unable to load config '{}'", cli.config))?;
    let resolver = build_resolver(&cli.define)?;

    execute(&cli, &cfg, &resolver, &command)
}

/// Assembles the two resolution tiers: `-D` overrides first, then the
/// process environment.
fn build_resolver(defines: &[String]) -> Result<Resolver> {
    let mut overrides = MapSource::new();
    for define in defines {
        let (key, value) = define
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid property override '{}': expected KEY=VALUE", define))?;
        if key.is_empty() {
            bail!("invalid property override '{}': empty key", define);
        }
        overrides.set(key, value);
    }

    Ok(Resolver::new(Box::new(overrides), Box::new(EnvSource::new())))
}

/// Executes a validated Shipgate command.
fn execute(cli: &Cli, cfg: &ShipgateConfig, resolver: &Resolver, command: &CommandRef) -> Result<()> {
    match command.primary {
        PrimaryCommand::Init => init::run(cli, command.selector.as_deref()),
        PrimaryCommand::Check => {
            let (registry_name, registry) = cfg.select_registry(command.selector.as_deref())?;
            let (username, token) = shipgate_gate::validate_registry(resolver, registry)?;
            println!(
                "check:{registry_name} ok ({} via {}, {} via {})",
                registry.username_key,
                username.tier.as_str(),
                registry.token_key,
                token.tier.as_str()
            );
            Ok(())
        }
        PrimaryCommand::Plan => {
            let (registry_name, registry) = cfg.select_registry(command.selector.as_deref())?;
            plan::run(registry_name, registry, resolver, cli.json)
        }
        PrimaryCommand::Publish => {
            let (registry_name, registry) = cfg.select_registry(command.selector.as_deref())?;
            let artifact = cli
                .artifact
                .as_deref()
                .ok_or_else(|| anyhow!("publish requires --artifact <path>"))?;

            // The gate runs unconditionally; the upload never starts on a
            // rejected attempt.
            let (username, token) = shipgate_gate::validate_registry(resolver, registry)?;
            let credentials = Credentials::new(username.value, token.value);

            if cli.dry_run {
                let file_name = artifact
                    .file_name()
                    .and_then(|name| name.to_str())
                    .ok_or_else(|| {
                        anyhow!("artifact path '{}' has no file name", artifact.display())
                    })?;
                println!(
                    "publish:{registry_name} dry-run: would upload {}",
                    shipgate_registry::upload_url(registry, &cfg.package, file_name)
                );
                return Ok(());
            }

            shipgate_registry::publish(registry, &cfg.package, &credentials, artifact)?;
            println!(
                "publish:{registry_name} uploaded {} {}",
                cfg.package.name, cfg.package.version
            );
            Ok(())
        }
    }
}
