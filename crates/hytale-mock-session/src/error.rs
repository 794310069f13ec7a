//! Error types for the session layer.

/// Errors returned by [`SessionRegistry`](crate::SessionRegistry) operations.
///
/// Every failure is reported before any state changes, so a caller that
/// gets an `Err` can assume the roster is exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The username was missing, not a string, or empty after trimming.
    #[error("username is missing, not a string, or blank")]
    InvalidInput,

    /// A player with this exact (case-sensitive) username is already in
    /// the roster.
    #[error("player {0:?} is already connected")]
    AlreadyPresent(String),

    /// The roster already holds `max_players` players.
    #[error("server is full ({max_players} players)")]
    Capacity { max_players: usize },

    /// No player with this username is in the roster.
    #[error("player {0:?} is not connected")]
    NotFound(String),
}
