//! `GameServer` builder and run loop.
//!
//! This is the entry point for running the mock. It ties the layers
//! together: protocol types → session registry → HTTP/push transport, plus
//! the uptime ticker in the background.
//!
//! # Shutdown
//!
//! ```text
//! signal future ──┐
//! ticker panic ───┼──→ CancellationToken::cancel()
//! shutdown_token()┘            │
//!                              ├──→ axum stops accepting, drains requests
//!                              ├──→ push subscribers get Close(1001)
//!                              └──→ uptime ticker exits
//!
//! drain finished within grace → run() returns Ok(())
//! grace elapsed               → run() returns ShutdownTimedOut
//! ```

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hytale_mock_session::{RegistryConfig, SessionRegistry};
use hytale_mock_tick::TickConfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::{Environment, ServerConfig};
use crate::{ServerError, routes, uptime};

/// Shared state handed to every request handler and push subscriber.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The registry
/// does its own locking, so nothing here needs a `Mutex`.
pub(crate) struct ServerState {
    pub(crate) registry: Arc<SessionRegistry>,
    pub(crate) environment: Environment,
    /// Cancelled once when the server starts shutting down.
    pub(crate) shutdown: CancellationToken,
}

/// Builder for configuring and starting a [`GameServer`].
///
/// # Example
///
/// ```rust,no_run
/// use hytale_mock::{Environment, GameServerBuilder};
///
/// # async fn start() -> Result<(), hytale_mock::ServerError> {
/// let server = GameServerBuilder::new()
///     .bind(([127, 0, 0, 1], 5520))
///     .environment(Environment::Development)
///     .build()
///     .await?;
/// server.run(async { tokio::signal::ctrl_c().await.ok(); }).await
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GameServerBuilder {
    config: ServerConfig,
}

impl GameServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: impl Into<SocketAddr>) -> Self {
        self.config.bind_addr = addr.into();
        self
    }

    /// Sets the registry metadata and capacity.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.config.registry = config;
        self
    }

    /// Sets the deployment environment. Development adds fault detail to
    /// 500 bodies.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    /// Serves files from `dir` for unmatched `GET`/`HEAD` requests.
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.static_dir = Some(dir.into());
        self
    }

    /// Sets how long connections get to drain at shutdown.
    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.config.shutdown_grace = grace;
        self
    }

    /// Sets the cadence of the uptime clock.
    pub fn tick_config(mut self, tick: TickConfig) -> Self {
        self.config.tick = tick;
        self
    }

    /// Binds the listener and creates the session registry.
    ///
    /// Nothing is served until [`GameServer::run`] is called.
    pub async fn build(self) -> Result<GameServer, ServerError> {
        let mut config = self.config;

        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.bind_addr.to_string(),
                source,
            })?;

        if let Some(dir) = config.static_dir.take_if(|dir| !dir.is_dir()) {
            tracing::warn!(dir = %dir.display(), "static directory not found, disabling static files");
        }

        let registry = Arc::new(SessionRegistry::new(config.registry.clone()));
        let state = Arc::new(ServerState {
            registry,
            environment: config.environment,
            shutdown: CancellationToken::new(),
        });

        Ok(GameServer {
            listener,
            config,
            state,
        })
    }
}

/// A bound, not-yet-running mock server.
///
/// Call [`run()`](Self::run) to start serving.
pub struct GameServer {
    listener: TcpListener,
    config: ServerConfig,
    state: Arc<ServerState>,
}

impl GameServer {
    /// Creates a new builder.
    pub fn builder() -> GameServerBuilder {
        GameServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The session registry this server serves.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.state.registry)
    }

    /// A handle that triggers shutdown when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.state.shutdown.clone()
    }

    /// Serves HTTP and the push channel until `signal` resolves (or the
    /// shutdown token is cancelled), then drains.
    ///
    /// # Errors
    /// - [`ServerError::Serve`] if the accept loop fails
    /// - [`ServerError::ShutdownTimedOut`] if connections are still open
    ///   after the grace period
    pub async fn run<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            listener,
            config,
            state,
        } = self;
        let shutdown = state.shutdown.clone();
        let grace = config.shutdown_grace;

        let addr = listener.local_addr().map_err(ServerError::Serve)?;
        tracing::info!(
            %addr,
            environment = %config.environment,
            max_players = state.registry.max_players(),
            "hytale mock server listening"
        );

        let ticker = uptime::spawn(Arc::clone(&state.registry), config.tick.clone(), shutdown.clone());

        // Turn the caller's signal into a token cancellation.
        let trigger = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = signal => {
                        tracing::info!("shutdown signal received");
                        shutdown.cancel();
                    }
                    _ = shutdown.cancelled() => {}
                }
            })
        };

        let app = routes::app(Arc::clone(&state), config.static_dir.as_deref());
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .into_future();
        tokio::pin!(serve);

        let result = tokio::select! {
            result = &mut serve => result.map_err(ServerError::Serve),
            _ = shutdown.cancelled() => {
                tracing::info!(grace_secs = grace.as_secs_f64(), "draining connections");
                match tokio::time::timeout(grace, &mut serve).await {
                    Ok(result) => result.map_err(ServerError::Serve),
                    Err(_) => Err(ServerError::ShutdownTimedOut(grace)),
                }
            }
        };

        // The serve loop can only end early on error; stop the rest too.
        shutdown.cancel();
        trigger.abort();
        let _ = ticker.await;

        let uptime = state.registry.uptime().await;
        match &result {
            Ok(()) => tracing::info!(uptime, "hytale mock server stopped"),
            Err(e) => tracing::error!(error = %e, uptime, "hytale mock server stopped with error"),
        }
        result
    }
}
