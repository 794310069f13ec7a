//! The session registry: the single source of truth for the roster.
//!
//! # Concurrency
//!
//! All mutable state (the roster and the uptime counter) lives behind one
//! `tokio::sync::RwLock`:
//!
//! - `join`, `leave` and `tick` take the **write** guard, so they are
//!   serialized against each other. In particular the three checks of
//!   `join` (valid name → not already present → not full) and the insert
//!   happen under a single guard, so two concurrent joins can never both
//!   pass the capacity check.
//! - `list_players`, `info` and friends take the **read** guard. Many
//!   readers run at once, and none of them can observe a half-applied
//!   mutation.
//!
//! Guards are never held across I/O: every method copies what it needs
//! into an owned snapshot before returning.

use chrono::{DateTime, Utc};
use hytale_mock_protocol::{Player, PlayerSummary, ServerInfo, ServerStatus};
use tokio::sync::RwLock;

use crate::auth::generate_token;
use crate::{AuthGrant, RegistryConfig, RegistryError, normalize_username};

/// What a successful [`SessionRegistry::join`] returns.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// The player that was just added.
    pub player: Player,
    /// Roster size right after the insert.
    pub players_online: usize,
}

/// Mutable state guarded by the registry lock.
#[derive(Debug, Default)]
struct RosterState {
    /// Joined players, oldest first. A `Vec` keeps join order for free,
    /// and the capacity bound keeps linear username lookups short.
    players: Vec<Player>,
    /// Seconds of uptime, advanced only by `tick`.
    elapsed_seconds: u64,
}

impl RosterState {
    fn position_of(&self, username: &str) -> Option<usize> {
        self.players.iter().position(|p| p.username == username)
    }
}

/// Owns the roster and the server metadata.
///
/// Create one at startup, share it behind an `Arc`, and drop it at
/// shutdown. Nothing is persisted.
///
/// ## Lifecycle of a player
///
/// ```text
/// join("steve") ──→ [in roster] ──→ leave("steve") ──→ (gone)
///       │                                 │
///       ├─ InvalidInput / AlreadyPresent  └─ InvalidInput / NotFound
///       └─ Capacity
/// ```
#[derive(Debug)]
pub struct SessionRegistry {
    config: RegistryConfig,
    status: ServerStatus,
    start_time: DateTime<Utc>,
    state: RwLock<RosterState>,
}

impl SessionRegistry {
    /// Creates an empty registry. `start_time` is now, uptime is 0.
    pub fn new(config: RegistryConfig) -> Self {
        let config = config.validated();
        tracing::debug!(
            name = %config.name,
            world = %config.world_name,
            max_players = config.max_players,
            "session registry created"
        );
        Self {
            config,
            status: ServerStatus::Running,
            start_time: Utc::now(),
            state: RwLock::new(RosterState::default()),
        }
    }

    /// Issues a placeholder token for a username.
    ///
    /// Does not touch the roster: an authenticated player still has to
    /// [`join`](Self::join).
    ///
    /// # Errors
    /// [`RegistryError::InvalidInput`] if the username is missing or blank.
    pub fn authenticate<'a>(
        &self,
        raw_username: impl Into<Option<&'a str>>,
    ) -> Result<AuthGrant, RegistryError> {
        let username = normalize_username(raw_username.into())?;
        tracing::info!(%username, "authenticated");
        Ok(AuthGrant {
            token: generate_token(),
            username,
        })
    }

    /// Adds a player to the roster.
    ///
    /// # Errors
    /// Checked in this order, all under the write guard:
    /// - [`RegistryError::InvalidInput`]: missing or blank username
    /// - [`RegistryError::AlreadyPresent`]: that exact username is joined
    /// - [`RegistryError::Capacity`]: roster already at `max_players`
    pub async fn join<'a>(
        &self,
        raw_username: impl Into<Option<&'a str>>,
    ) -> Result<JoinOutcome, RegistryError> {
        let username = normalize_username(raw_username.into())?;

        let mut state = self.state.write().await;

        if state.position_of(&username).is_some() {
            tracing::debug!(%username, "join rejected: already connected");
            return Err(RegistryError::AlreadyPresent(username));
        }
        if state.players.len() >= self.config.max_players {
            tracing::debug!(%username, "join rejected: server full");
            return Err(RegistryError::Capacity {
                max_players: self.config.max_players,
            });
        }

        let player = Player::spawn(username);
        state.players.push(player.clone());
        let players_online = state.players.len();

        tracing::info!(
            player_id = %player.id,
            username = %player.username,
            players_online,
            "player joined"
        );

        Ok(JoinOutcome {
            player,
            players_online,
        })
    }

    /// Removes the player with this username and returns the new roster size.
    ///
    /// # Errors
    /// - [`RegistryError::InvalidInput`]: missing or blank username
    /// - [`RegistryError::NotFound`]: nobody with that username is joined
    pub async fn leave<'a>(
        &self,
        raw_username: impl Into<Option<&'a str>>,
    ) -> Result<usize, RegistryError> {
        let username = normalize_username(raw_username.into())?;

        let mut state = self.state.write().await;
        let Some(index) = state.position_of(&username) else {
            tracing::debug!(%username, "leave rejected: not connected");
            return Err(RegistryError::NotFound(username));
        };

        // `remove` (not `swap_remove`) keeps the rest in join order.
        let player = state.players.remove(index);
        let players_online = state.players.len();

        tracing::info!(
            player_id = %player.id,
            username = %player.username,
            players_online,
            "player left"
        );

        Ok(players_online)
    }

    /// Snapshot of the roster, oldest join first.
    pub async fn list_players(&self) -> Vec<PlayerSummary> {
        let state = self.state.read().await;
        state.players.iter().map(Player::summary).collect()
    }

    /// Snapshot of the server metadata with the current player count.
    pub async fn info(&self) -> ServerInfo {
        let state = self.state.read().await;
        ServerInfo {
            name: self.config.name.clone(),
            version: self.config.version.clone(),
            status: self.status,
            world_name: self.config.world_name.clone(),
            players_online: state.players.len(),
            max_players: self.config.max_players,
            uptime: state.elapsed_seconds,
            start_time: self.start_time,
        }
    }

    /// Advances uptime by one second and returns the new value.
    ///
    /// Meant to be driven by a single ticker task, once per second.
    pub async fn tick(&self) -> u64 {
        let mut state = self.state.write().await;
        state.elapsed_seconds += 1;
        state.elapsed_seconds
    }

    /// Current roster size.
    pub async fn players_online(&self) -> usize {
        self.state.read().await.players.len()
    }

    /// Whole seconds of uptime counted so far.
    pub async fn uptime(&self) -> u64 {
        self.state.read().await.elapsed_seconds
    }

    /// Roster capacity (after validation).
    pub fn max_players(&self) -> usize {
        self.config.max_players
    }

    /// The configuration the registry was created with (after validation).
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// When the registry was created.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionRegistry`.
    //!
    //! Naming convention: `test_{operation}_{scenario}_{expected}`.
    //! Concurrency is covered separately in `tests/concurrency.rs`.

    use super::*;

    // -- Helpers ----------------------------------------------------------

    fn registry_with_capacity(max_players: usize) -> SessionRegistry {
        SessionRegistry::new(RegistryConfig {
            max_players,
            ..RegistryConfig::default()
        })
    }

    async fn usernames(registry: &SessionRegistry) -> Vec<String> {
        registry
            .list_players()
            .await
            .into_iter()
            .map(|p| p.username)
            .collect()
    }

    // =====================================================================
    // authenticate()
    // =====================================================================

    #[tokio::test]
    async fn test_authenticate_valid_username_returns_token_and_name() {
        let registry = SessionRegistry::default();

        let grant = registry.authenticate("  player1 ").expect("should succeed");

        assert_eq!(grant.username, "player1");
        assert!(grant.token.starts_with("mock-token-"));
    }

    #[tokio::test]
    async fn test_authenticate_does_not_join() {
        let registry = SessionRegistry::default();

        registry.authenticate("player1").unwrap();

        assert_eq!(registry.players_online().await, 0);
    }

    #[tokio::test]
    async fn test_authenticate_twice_returns_different_tokens() {
        let registry = SessionRegistry::default();

        let a = registry.authenticate("player1").unwrap();
        let b = registry.authenticate("player1").unwrap();

        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn test_authenticate_blank_or_missing_returns_invalid_input() {
        let registry = SessionRegistry::default();

        assert_eq!(registry.authenticate(""), Err(RegistryError::InvalidInput));
        assert_eq!(registry.authenticate("   "), Err(RegistryError::InvalidInput));
        assert_eq!(registry.authenticate(None::<&str>), Err(RegistryError::InvalidInput));
    }

    // =====================================================================
    // join()
    // =====================================================================

    #[tokio::test]
    async fn test_join_new_player_returns_player_and_count() {
        let registry = SessionRegistry::default();

        let outcome = registry.join("player1").await.expect("should succeed");

        assert_eq!(outcome.player.username, "player1");
        assert_eq!(outcome.players_online, 1);
        assert_eq!(outcome.player.position, hytale_mock_protocol::Position::ORIGIN);
    }

    #[tokio::test]
    async fn test_join_trims_username() {
        let registry = SessionRegistry::default();

        let outcome = registry.join("\t steve  ").await.unwrap();

        assert_eq!(outcome.player.username, "steve");
    }

    #[tokio::test]
    async fn test_join_accepts_every_length_from_1_to_32() {
        let registry = registry_with_capacity(32);

        for len in 1..=32 {
            let name = "x".repeat(len);
            let outcome = registry.join(name.as_str()).await.unwrap();
            assert_eq!(outcome.player.username, name);
        }
        assert_eq!(registry.players_online().await, 32);
    }

    #[tokio::test]
    async fn test_join_duplicate_returns_already_present() {
        let registry = SessionRegistry::default();
        registry.join("player1").await.unwrap();

        let result = registry.join("player1").await;

        assert_eq!(result, Err(RegistryError::AlreadyPresent("player1".into())));
        assert_eq!(registry.players_online().await, 1, "roster must be unchanged");
    }

    #[tokio::test]
    async fn test_join_duplicate_after_normalization_returns_already_present() {
        // " player1 " normalizes to "player1", which is already joined.
        let registry = SessionRegistry::default();
        registry.join("player1").await.unwrap();

        let result = registry.join(" player1 ").await;

        assert!(matches!(result, Err(RegistryError::AlreadyPresent(_))));
    }

    #[tokio::test]
    async fn test_join_is_case_sensitive() {
        let registry = SessionRegistry::default();
        registry.join("Steve").await.unwrap();

        let result = registry.join("steve").await;

        assert!(result.is_ok(), "usernames differing in case are distinct");
        assert_eq!(registry.players_online().await, 2);
    }

    #[tokio::test]
    async fn test_join_full_server_returns_capacity() {
        let registry = registry_with_capacity(3);
        for name in ["a", "b", "c"] {
            registry.join(name).await.unwrap();
        }

        let result = registry.join("d").await;

        assert_eq!(result, Err(RegistryError::Capacity { max_players: 3 }));
        assert_eq!(registry.players_online().await, 3);
    }

    #[tokio::test]
    async fn test_join_duplicate_on_full_server_reports_already_present() {
        // The duplicate check runs before the capacity check.
        let registry = registry_with_capacity(1);
        registry.join("a").await.unwrap();

        let result = registry.join("a").await;

        assert!(matches!(result, Err(RegistryError::AlreadyPresent(_))));
    }

    #[tokio::test]
    async fn test_join_invalid_input_leaves_roster_unchanged() {
        let registry = SessionRegistry::default();
        registry.join("a").await.unwrap();

        for raw in [Some(""), Some("   "), None] {
            assert_eq!(registry.join(raw).await, Err(RegistryError::InvalidInput));
        }
        assert_eq!(usernames(&registry).await, vec!["a"]);
    }

    #[tokio::test]
    async fn test_join_assigns_unique_ids() {
        let registry = SessionRegistry::default();

        let a = registry.join("a").await.unwrap().player.id;
        registry.leave("a").await.unwrap();
        let b = registry.join("a").await.unwrap().player.id;

        assert_ne!(a, b, "rejoining must not reuse the old id");
    }

    // =====================================================================
    // leave()
    // =====================================================================

    #[tokio::test]
    async fn test_leave_joined_player_decrements_count() {
        let registry = SessionRegistry::default();
        registry.join("a").await.unwrap();
        registry.join("b").await.unwrap();

        let remaining = registry.leave("a").await.expect("should succeed");

        assert_eq!(remaining, 1);
        assert_eq!(usernames(&registry).await, vec!["b"]);
    }

    #[tokio::test]
    async fn test_leave_unknown_player_returns_not_found() {
        let registry = SessionRegistry::default();

        let result = registry.leave("ghost").await;

        assert_eq!(result, Err(RegistryError::NotFound("ghost".into())));
    }

    #[tokio::test]
    async fn test_leave_twice_returns_not_found() {
        let registry = SessionRegistry::default();
        registry.join("a").await.unwrap();
        registry.leave("a").await.unwrap();

        let result = registry.leave("a").await;

        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_leave_normalizes_username() {
        let registry = SessionRegistry::default();
        registry.join("steve").await.unwrap();

        assert_eq!(registry.leave("  steve ").await, Ok(0));
    }

    #[tokio::test]
    async fn test_leave_blank_returns_invalid_input() {
        let registry = SessionRegistry::default();
        registry.join("a").await.unwrap();

        assert_eq!(registry.leave(" ").await, Err(RegistryError::InvalidInput));
        assert_eq!(registry.leave(None::<&str>).await, Err(RegistryError::InvalidInput));
        assert_eq!(registry.players_online().await, 1);
    }

    #[tokio::test]
    async fn test_leave_frees_a_slot_on_full_server() {
        let registry = registry_with_capacity(1);
        registry.join("a").await.unwrap();
        registry.leave("a").await.unwrap();

        assert!(registry.join("b").await.is_ok());
    }

    // =====================================================================
    // list_players()
    // =====================================================================

    #[tokio::test]
    async fn test_list_players_empty_registry_returns_empty() {
        let registry = SessionRegistry::default();
        assert!(registry.list_players().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_players_preserves_join_order() {
        let registry = SessionRegistry::default();
        registry.join("a").await.unwrap();
        registry.join("b").await.unwrap();

        assert_eq!(usernames(&registry).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_list_players_keeps_order_after_middle_leave() {
        let registry = SessionRegistry::default();
        for name in ["a", "b", "c"] {
            registry.join(name).await.unwrap();
        }
        registry.leave("b").await.unwrap();
        registry.join("d").await.unwrap();

        assert_eq!(usernames(&registry).await, vec!["a", "c", "d"]);
    }

    #[tokio::test]
    async fn test_list_players_matches_joined_ids() {
        let registry = SessionRegistry::default();
        let joined = registry.join("a").await.unwrap().player;

        let listed = registry.list_players().await;

        assert_eq!(listed, vec![joined.summary()]);
    }

    // =====================================================================
    // info() / tick()
    // =====================================================================

    #[tokio::test]
    async fn test_info_reports_metadata_and_count() {
        let registry = registry_with_capacity(5);
        registry.join("a").await.unwrap();

        let info = registry.info().await;

        assert_eq!(info.name, "Hytale Server (Mock)");
        assert_eq!(info.version, "0.2.0");
        assert_eq!(info.world_name, "Zone 1");
        assert_eq!(info.status, ServerStatus::Running);
        assert_eq!(info.players_online, 1);
        assert_eq!(info.max_players, 5);
        assert_eq!(info.uptime, 0);
        assert_eq!(info.start_time, registry.start_time());
    }

    #[tokio::test]
    async fn test_tick_n_times_advances_uptime_by_n() {
        let registry = SessionRegistry::default();

        for expected in 1..=7 {
            assert_eq!(registry.tick().await, expected);
        }

        assert_eq!(registry.info().await.uptime, 7);
        assert_eq!(registry.uptime().await, 7);
    }

    #[tokio::test]
    async fn test_tick_does_not_touch_roster() {
        let registry = SessionRegistry::default();
        registry.join("a").await.unwrap();

        registry.tick().await;

        assert_eq!(registry.players_online().await, 1);
    }

    #[test]
    fn test_new_with_zero_capacity_is_raised_to_one() {
        let registry = registry_with_capacity(0);
        assert_eq!(registry.max_players(), 1);
        assert_eq!(registry.config().max_players, 1);
    }

    // =====================================================================
    // Full lifecycle
    // =====================================================================

    #[tokio::test]
    async fn test_full_lifecycle_join_duplicate_list_leave() {
        let registry = SessionRegistry::default();

        // 1. First join succeeds.
        assert_eq!(registry.join("player1").await.unwrap().players_online, 1);
        // 2. Same name again is rejected.
        assert!(matches!(
            registry.join("player1").await,
            Err(RegistryError::AlreadyPresent(_))
        ));
        // 3. Listing shows exactly one player.
        assert_eq!(registry.list_players().await.len(), 1);
        // 4. Leaving empties the roster.
        assert_eq!(registry.leave("player1").await, Ok(0));
        // 5. Leaving again is NotFound.
        assert!(matches!(
            registry.leave("player1").await,
            Err(RegistryError::NotFound(_))
        ));
    }
}
