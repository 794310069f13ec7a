//! Core record types: players, positions, and server metadata.
//!
//! These are the values the session registry stores and hands out as
//! snapshots. They are plain data: cloning one never touches the
//! registry's lock.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A unique identifier for a joined player.
///
/// A newtype around a random (v4) UUID. Two players never share an id
/// during the lifetime of a registry, even after one of them leaves.
///
/// `#[serde(transparent)]` serializes this as the bare UUID string,
/// not as `{ "0": "..." }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Generates a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point in the world.
///
/// Players spawn at the origin and stay there: the mock does not simulate
/// movement. The coordinates exist so clients written against a real
/// server find the fields they expect.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// The world origin, `(0, 0, 0)`.
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A player currently in the roster.
///
/// On the wire the position is flattened into the player object:
///
/// ```text
/// { "id": "…", "username": "steve", "joinedAt": "…", "x": 0, "y": 0, "z": 0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    /// Normalized username (trimmed, at most 32 characters).
    pub username: String,
    pub joined_at: DateTime<Utc>,
    #[serde(flatten)]
    pub position: Position,
}

impl Player {
    /// Creates a player who joins right now, standing at the origin.
    pub fn spawn(username: String) -> Self {
        Self {
            id: PlayerId::random(),
            username,
            joined_at: Utc::now(),
            position: Position::ORIGIN,
        }
    }

    /// The roster-listing view of this player (no position).
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            username: self.username.clone(),
            joined_at: self.joined_at,
        }
    }
}

/// The subset of a [`Player`] returned by roster listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Server metadata
// ---------------------------------------------------------------------------

/// Whether the mock reports itself as up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    #[default]
    Running,
    Stopped,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// A point-in-time snapshot of the server metadata.
///
/// Served as-is by `GET /api/server/info` and pushed to every new
/// WebSocket subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub status: ServerStatus,
    pub world_name: String,
    pub players_online: usize,
    pub max_players: usize,
    /// Whole seconds since the server started ticking.
    pub uptime: u64,
    pub start_time: DateTime<Utc>,
}

// =========================================================================
// Tests
// =========================================================================
