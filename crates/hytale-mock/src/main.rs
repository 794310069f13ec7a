//! `hytale-mock` binary: parse flags, install logging and signal handlers,
//! run the server until SIGINT/SIGTERM.

mod cli;
mod signals;

use clap::Parser;
use hytale_mock::{GameServerBuilder, ServerError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::signals::ShutdownSignal;

const DEFAULT_LOG_FILTER: &str = "hytale_mock=info,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging();

    let config = cli.into_config();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting hytale mock server");

    let signal = ShutdownSignal::install()?;
    let server = GameServerBuilder::from_config(config).build().await?;

    match server.run(signal.recv()).await {
        Ok(()) => Ok(()),
        Err(ServerError::ShutdownTimedOut(grace)) => {
            tracing::error!(grace_secs = grace.as_secs_f64(), "forcing exit after grace period");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Installs the `fmt` subscriber. `RUST_LOG` overrides the default filter.
fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
