//! Process signal handling for graceful shutdown.
//!
//! Handlers are installed up front so a failure surfaces before the server
//! starts, instead of as an instant shutdown later.

use hytale_mock::ServerError;
use tokio::signal;
use tracing::info;

/// Installed termination-signal listeners.
///
/// * **Unix**: SIGINT and SIGTERM
/// * **Elsewhere**: Ctrl+C
pub struct ShutdownSignal {
    #[cfg(unix)]
    sigint: signal::unix::Signal,
    #[cfg(unix)]
    sigterm: signal::unix::Signal,
}

impl ShutdownSignal {
    /// Registers the listeners with the OS.
    pub fn install() -> Result<Self, ServerError> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            Ok(Self {
                sigint: signal(SignalKind::interrupt()).map_err(ServerError::Signal)?,
                sigterm: signal(SignalKind::terminate()).map_err(ServerError::Signal)?,
            })
        }

        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Resolves when the first termination signal arrives.
    pub async fn recv(self) {
        #[cfg(unix)]
        {
            let Self {
                mut sigint,
                mut sigterm,
            } = self;
            tokio::select! {
                _ = sigint.recv() => info!("received SIGINT"),
                _ = sigterm.recv() => info!("received SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            match signal::ctrl_c().await {
                Ok(()) => info!("received Ctrl+C"),
                Err(e) => {
                    tracing::error!(error = %e, "Ctrl+C listener failed, shutting down");
                }
            }
        }
    }
}
