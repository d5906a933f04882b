// ABOUTME: Configuration types and parsing for d2ship.yml.
// ABOUTME: Handles YAML parsing, file discovery and D2SHIP_* environment overrides.

mod env;

pub use env::{ENV_OVERRIDES, apply_env_overrides};

use crate::error::{Error, Result};
use crate::fetch::RoutingMode;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "d2ship.yml";
pub const CONFIG_FILENAME_ALT: &str = "d2ship.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".d2ship/config.yml";

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_REGISTRY_HOST: &str = "docker.eyeseetea.com";
pub const DEFAULT_DHIS2_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the d2-docker lifecycle gateway.
    pub api_url: String,

    /// Host of the image registry (Harbor).
    pub registry_host: String,

    /// Public host used to build instance URLs.
    pub dhis2_host: String,

    pub default_port: u16,

    pub hide_advanced_options: bool,

    /// Local development: requests go through the relay from the start.
    pub development: bool,

    /// Relay prefixed to request URLs in alternate routing mode.
    pub cors_relay: Option<String>,

    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            registry_host: DEFAULT_REGISTRY_HOST.to_string(),
            dhis2_host: DEFAULT_DHIS2_HOST.to_string(),
            default_port: DEFAULT_PORT,
            hide_advanced_options: false,
            development: false,
            cors_relay: None,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(300)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.check()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Discover a config file in `dir` (defaults when there is none), then
    /// apply environment overrides.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config = match Self::discover(dir) {
            Ok(config) => config,
            Err(Error::ConfigNotFound(_)) => {
                tracing::debug!("no config file in {}, using defaults", dir.display());
                Self::default()
            }
            Err(e) => return Err(e),
        };
        apply_env_overrides(config)
    }

    /// Routing mode requests start in.
    pub fn routing_mode(&self) -> RoutingMode {
        if self.development {
            RoutingMode::Alternate
        } else {
            RoutingMode::Direct
        }
    }

    /// URL of an instance published on `port`.
    pub fn instance_url(&self, port: u16) -> String {
        format!("http://{}:{}", self.dhis2_host, port)
    }

    pub(crate) fn check(mut self) -> Result<Self> {
        self.api_url = self.api_url.trim_end_matches('/').to_string();
        check_plain_http("api_url", &self.api_url)?;
        if let Some(relay) = &self.cors_relay {
            check_plain_http("cors_relay", relay)?;
        }
        if self.registry_host.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "registry_host cannot be empty".to_string(),
            ));
        }
        if self.default_port == 0 {
            return Err(Error::InvalidConfig(
                "default_port must be greater than 0".to_string(),
            ));
        }
        Ok(self)
    }
}

/// The transport has no TLS connector, so only `http://` URLs can be reached.
fn check_plain_http(field: &str, url: &str) -> Result<()> {
    if url.starts_with("http://") {
        return Ok(());
    }
    if url.starts_with("https://") {
        return Err(Error::InvalidConfig(format!(
            "{field} uses https, but TLS is not supported; use an http:// URL: {url}"
        )));
    }
    Err(Error::InvalidConfig(format!(
        "{field} must be an http:// URL: {url}"
    )))
}
