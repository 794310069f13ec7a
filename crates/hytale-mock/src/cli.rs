//! Command-line interface.
//!
//! Every flag can also come from an environment variable, so the binary
//! drops into container and Codespace setups that only set `PORT`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use hytale_mock::{DEFAULT_PORT, Environment, RegistryConfig, ServerConfig, uptime_tick_config};

/// Mock Hytale game server: session API over HTTP plus a WebSocket push channel.
#[derive(Debug, Clone, Parser)]
#[command(name = "hytale-mock", version, about)]
pub struct Cli {
    /// Interface to listen on.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Roster capacity (0 is raised to 1).
    #[arg(long, env = "MAX_PLAYERS", default_value_t = 10)]
    pub max_players: usize,

    /// Server name reported by /api/server/info.
    #[arg(long, env = "SERVER_NAME")]
    pub server_name: Option<String>,

    /// World name reported by /api/server/info.
    #[arg(long, env = "WORLD_NAME")]
    pub world_name: Option<String>,

    /// development or production. Development adds fault detail to 500s.
    #[arg(long = "env", env = "APP_ENV", default_value_t = Environment::Production)]
    pub environment: Environment,

    /// Directory served for unmatched GET requests. Ignored if missing.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Seconds open connections get to close after SIGINT/SIGTERM.
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 10)]
    pub shutdown_grace_secs: u64,
}

impl Cli {
    /// Folds the parsed flags over the defaults.
    pub fn into_config(self) -> ServerConfig {
        let defaults = RegistryConfig::default();
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            registry: RegistryConfig {
                name: self.server_name.unwrap_or(defaults.name),
                world_name: self.world_name.unwrap_or(defaults.world_name),
                max_players: self.max_players,
                version: defaults.version,
            },
            environment: self.environment,
            static_dir: Some(self.static_dir),
            shutdown_grace: Duration::from_secs(self.shutdown_grace_secs),
            tick: uptime_tick_config(),
        }
    }
}
