//! Wire protocol for the Hytale mock server.
//!
//! This crate defines every structure that leaves the process, either as
//! an HTTP JSON body or as a push-channel frame:
//!
//! - **Types** ([`Player`], [`ServerInfo`], [`PlayerId`], etc.): the
//!   roster and metadata records the session layer hands out.
//! - **API bodies** ([`UsernameRequest`], [`JoinResponse`], etc.): the
//!   request and response shapes of each HTTP endpoint.
//! - **Push events** ([`PushEvent`]): frames sent over the WebSocket
//!   push channel.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding or
//!   decoding push frames.
//!
//! # Architecture
//!
//! The protocol layer is the bottom of the stack. It knows nothing about
//! locks, sockets, or routing: only about shapes on the wire.
//!
//! ```text
//! Server (axum routes, push channel) → Session (registry) → Protocol (types)
//! ```
//!
//! All field names are camelCase on the wire (`joinedAt`, `playersOnline`)
//! so existing JavaScript clients of the mock keep working.

mod api;
mod error;
mod push;
mod types;

pub use api::{
    AuthResponse, ErrorBody, HealthResponse, IndexResponse, JoinResponse,
    LeaveResponse, PlayerListResponse, UsernameRequest,
};
pub use error::ProtocolError;
pub use push::PushEvent;
pub use types::{Player, PlayerId, PlayerSummary, Position, ServerInfo, ServerStatus};
