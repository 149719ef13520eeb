//! Runtime configuration, read from the environment once at startup.

use std::net::SocketAddr;

use thiserror::Error;
use tracing::warn;

/// Signing secret used when `JWT_PASSWORD` is unset. Fine for local runs,
/// useless for anything else: every token it signs is forgeable.
const DEV_JWT_SECRET: &str = "scribble-dev-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SCRIBBLE_ADDR `{value}` is not a socket address: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("{name} must be a boolean (true/false/1/0), got `{value}`")]
    InvalidFlag { name: &'static str, value: String },
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Whether `jwt_secret` came from `JWT_PASSWORD` rather than the dev default
    pub jwt_secret_configured: bool,
    /// Seed the test user, sample blogs and the legacy token alias
    pub seed_fixtures: bool,
}

impl Config {
    /// Reads `JWT_PASSWORD`, `SCRIBBLE_ADDR` and `SCRIBBLE_SEED_FIXTURES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, so tests never touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = match lookup("SCRIBBLE_ADDR") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddr { value, source })?,
            None => default_addr(),
        };

        let (jwt_secret, jwt_secret_configured) = match lookup("JWT_PASSWORD") {
            Some(secret) if !secret.is_empty() => (secret, true),
            _ => {
                warn!("JWT_PASSWORD is not set; signing tokens with the development secret");
                (DEV_JWT_SECRET.to_owned(), false)
            }
        };

        let seed_fixtures = match lookup("SCRIBBLE_SEED_FIXTURES") {
            Some(value) => parse_flag("SCRIBBLE_SEED_FIXTURES", value)?,
            None => true,
        };

        Ok(Self { bind_addr, jwt_secret, jwt_secret_configured, seed_fixtures })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_addr(),
            jwt_secret: DEV_JWT_SECRET.to_owned(),
            jwt_secret_configured: false,
            seed_fixtures: true,
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8787))
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}
