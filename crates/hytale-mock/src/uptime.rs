//! Uptime ticker: the one background task of the server.
//!
//! ```text
//! supervisor ──awaits──→ ticker loop
//!     │                    select! {
//!     │                      shutdown.cancelled() → exit
//!     │                      wait_for_tick()      → registry.tick()
//!     │                    }
//!     └─ on panic: log at error, cancel shutdown token
//! ```

use std::sync::Arc;

use hytale_mock_session::SessionRegistry;
use hytale_mock_tick::{TickConfig, TickScheduler};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawns the ticker and its supervisor. The returned handle completes
/// once the ticker has stopped for any reason.
pub(crate) fn spawn(
    registry: Arc<SessionRegistry>,
    tick: TickConfig,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let ticker = tokio::spawn(run(registry, tick, shutdown.clone()));
    supervise(ticker, shutdown)
}

/// Waits for `ticker` and turns a panic into a shutdown request.
fn supervise(ticker: JoinHandle<()>, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match ticker.await {
            Ok(()) => tracing::debug!("uptime ticker stopped"),
            Err(e) if e.is_panic() => {
                tracing::error!(error = %e, "uptime ticker panicked, shutting down");
                shutdown.cancel();
            }
            Err(e) => tracing::debug!(error = %e, "uptime ticker cancelled"),
        }
    })
}

async fn run(registry: Arc<SessionRegistry>, tick: TickConfig, shutdown: CancellationToken) {
    let mut scheduler = TickScheduler::new(tick);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = scheduler.wait_for_tick() => {
                let uptime = registry.tick().await;
                tracing::trace!(uptime, "uptime advanced");
            }
        }
    }
    let metrics = scheduler.metrics();
    tracing::debug!(
        ticks = metrics.total_ticks,
        overruns = metrics.total_overruns,
        skipped = metrics.total_skipped,
        "uptime ticker exiting"
    );
}
