use std::fmt;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info};

use shipgate_core::{PackageConfig, RegistryConfig};

/// Credentials handed over by a successful gate run.
///
/// Owned for the duration of a single publish attempt and dropped with it.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    fn basic_auth(&self) -> String {
        let pair = format!("{}:{}", self.username, self.token);
        format!("Basic {}", STANDARD.encode(pair))
    }
}

// The token must not reach log output through `{:?}`.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Destination for one artifact upload, in Maven repository layout:
/// `<base>/<package>/<version>/<file>`.
pub fn upload_url(registry: &RegistryConfig, package: &PackageConfig, file_name: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        registry.url.trim_end_matches('/'),
        package.name,
        package.version,
        file_name
    )
}

/// Uploads `artifact` to the registry.
///
/// This is the sole network path in the workspace and runs only after the
/// gate has validated the credentials it receives.
pub fn publish(
    registry: &RegistryConfig,
    package: &PackageConfig,
    credentials: &Credentials,
    artifact: &Path,
) -> Result<()> {
    let file_name = artifact
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("artifact path '{}' has no file name", artifact.display()))?;

    let body = std::fs::read(artifact)
        .with_context(|| format!("failed to read artifact '{}'", artifact.display()))?;

    let url = upload_url(registry, package, file_name);
    info!("uploading {} ({} bytes) to {}", file_name, body.len(), url);

    let response = ureq::put(&url)
        .set("Authorization", &credentials.basic_auth())
        .set("Content-Type", "application/octet-stream")
        .send_bytes(&body);

    match response {
        Ok(resp) => {
            debug!("registry answered {}", resp.status());
            Ok(())
        }
        Err(ureq::Error::Status(code, _)) => {
            bail!("registry rejected upload with status {code}: {url}")
        }
        Err(e) => Err(e).with_context(|| format!("failed to reach registry at {url}")),
    }
}
