//! Player session registry for the Hytale mock server.
//!
//! This crate is the one piece of the mock with real invariants:
//!
//! 1. **Authentication**: handing out opaque placeholder tokens
//!    ([`SessionRegistry::authenticate`])
//! 2. **Roster tracking**: who is joined, in join order, with unique
//!    usernames and a hard capacity ([`SessionRegistry::join`],
//!    [`SessionRegistry::leave`])
//! 3. **Metadata**: name, version, world, start time and uptime
//!    ([`SessionRegistry::info`], [`SessionRegistry::tick`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)  ← HTTP handlers, push channel and the uptime ticker call in
//!     ↕
//! Session Layer (this crate)  ← owns the roster behind a single lock
//!     ↕
//! Protocol Layer (below)  ← provides Player, ServerInfo, PlayerId
//! ```

mod auth;
mod config;
mod error;
mod registry;
mod username;

pub use auth::AuthGrant;
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use registry::{JoinOutcome, SessionRegistry};
pub use username::{MAX_USERNAME_CHARS, normalize_username};
