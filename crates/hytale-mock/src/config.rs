//! Server configuration.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use hytale_mock_session::RegistryConfig;
use hytale_mock_tick::{TickConfig, TickPolicy};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5520;

/// Deployment mode. Controls how much fault detail reaches clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// 500 responses include a `message` with the fault detail.
    Development,
    /// 500 responses carry only the generic error.
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}

/// Returned when an environment name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment {0:?} (expected development or production)")]
pub struct ParseEnvironmentError(String);

impl FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// Everything needed to start a [`GameServer`](crate::GameServer).
///
/// Usually assembled through [`GameServerBuilder`](crate::GameServerBuilder)
/// rather than by hand.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on. Port 0 picks a free port.
    pub bind_addr: SocketAddr,
    /// Metadata and capacity handed to the session registry.
    pub registry: RegistryConfig,
    pub environment: Environment,
    /// Directory served for unmatched `GET`/`HEAD` requests. `None`
    /// disables static files.
    pub static_dir: Option<PathBuf>,
    /// How long open connections get to drain after shutdown is triggered.
    pub shutdown_grace: Duration,
    /// Cadence of the uptime clock.
    pub tick: TickConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            registry: RegistryConfig::default(),
            environment: Environment::default(),
            static_dir: None,
            shutdown_grace: Duration::from_secs(10),
            tick: uptime_tick_config(),
        }
    }
}

/// One tick per second. After a stall, up to a minute of missed seconds is
/// replayed so uptime stays close to wall-clock time.
pub fn uptime_tick_config() -> TickConfig {
    TickConfig::every(Duration::from_secs(1)).with_policy(TickPolicy::CatchUp { max_catchup: 60 })
}
