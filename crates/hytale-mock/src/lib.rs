//! # Hytale mock server
//!
//! An HTTP + WebSocket process that imitates a Hytale game server's session
//! lifecycle (authenticate, join, leave, list, health and info) without any
//! game logic behind it.
//!
//! ```text
//! ┌──────────────────────── hytale-mock ────────────────────────┐
//! │  routes (axum)        push (/ws)           uptime ticker    │
//! └───────┬──────────────────┬──────────────────────┬───────────┘
//!         ▼                  ▼                      ▼
//! ┌────────────────── hytale-mock-session ──────────────────────┐
//! │  SessionRegistry: roster, capacity, uptime (one RwLock)     │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            ▼
//!                   hytale-mock-protocol
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hytale_mock::GameServer;
//!
//! # async fn start() -> Result<(), hytale_mock::ServerError> {
//! let server = GameServer::builder()
//!     .bind(([0, 0, 0, 0], 5520))
//!     .build()
//!     .await?;
//! server.run(std::future::pending()).await
//! # }
//! ```

mod config;
mod error;
mod push;
mod routes;
mod server;
mod uptime;

pub use config::{DEFAULT_PORT, Environment, ParseEnvironmentError, ServerConfig, uptime_tick_config};
pub use error::{ApiError, ServerError};
pub use routes::router;
pub use server::{GameServer, GameServerBuilder};

pub use hytale_mock_protocol as protocol;
pub use hytale_mock_session::{RegistryConfig, SessionRegistry};
pub use hytale_mock_tick::{TickConfig, TickPolicy};
