//! Server configuration from the environment
//!
//! Every setting has a default; a variable that is present but unparsable is
//! an error rather than being silently ignored.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Settings for chat sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Cosmetic pause before each assistant reply
    pub typing_delay: Duration,
    /// Sessions untouched for this long are dropped
    pub idle_ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            typing_delay: DEFAULT_TYPING_DELAY,
            idle_ttl: DEFAULT_SESSION_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            bind: parse_var(&lookup, "LEARNSYNC_BIND")?.unwrap_or(defaults.bind),
            port: parse_var(&lookup, "LEARNSYNC_PORT")?.unwrap_or(defaults.port),
            session: SessionConfig {
                typing_delay: parse_var(&lookup, "LEARNSYNC_TYPING_DELAY_MS")?
                    .map_or(defaults.session.typing_delay, Duration::from_millis),
                idle_ttl: parse_var(&lookup, "LEARNSYNC_SESSION_TTL_SECS")?
                    .map_or(defaults.session.idle_ttl, Duration::from_secs),
                sweep_interval: parse_var(&lookup, "LEARNSYNC_SWEEP_INTERVAL_SECS")?
                    .map_or(defaults.session.sweep_interval, Duration::from_secs),
            },
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
