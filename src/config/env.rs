// ABOUTME: Environment variable overrides for configuration values.
// ABOUTME: D2SHIP_* variables win over the config file and the built-in defaults.

use super::Config;
use crate::error::{Error, Result};

/// Variables read by [`apply_env_overrides`], in application order.
pub const ENV_OVERRIDES: &[&str] = &[
    "D2SHIP_API_URL",
    "D2SHIP_REGISTRY_HOST",
    "D2SHIP_DHIS2_HOST",
    "D2SHIP_DEFAULT_PORT",
    "D2SHIP_DEVELOPMENT",
    "D2SHIP_CORS_RELAY",
];

pub fn apply_env_overrides(mut config: Config) -> Result<Config> {
    for var in ENV_OVERRIDES {
        let Some(value) = read(var) else {
            continue;
        };
        match *var {
            "D2SHIP_API_URL" => config.api_url = value,
            "D2SHIP_REGISTRY_HOST" => config.registry_host = value,
            "D2SHIP_DHIS2_HOST" => config.dhis2_host = value,
            "D2SHIP_DEFAULT_PORT" => {
                config.default_port = value
                    .parse()
                    .map_err(|_| Error::InvalidConfig(format!("{var}: invalid port: {value}")))?
            }
            "D2SHIP_DEVELOPMENT" => config.development = parse_bool(var, &value)?,
            "D2SHIP_CORS_RELAY" => config.cors_relay = Some(value),
            _ => {}
        }
    }
    config.check()
}

// Unset and empty are treated the same.
fn read(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(Error::InvalidConfig(format!(
            "{var}: expected a boolean, got {other}"
        ))),
    }
}
