//! Registry configuration.

use tracing::warn;

/// Static server metadata and limits, fixed at startup.
///
/// ```rust
/// use hytale_mock_session::RegistryConfig;
///
/// let config = RegistryConfig {
///     world_name: "Orbis".into(),
///     max_players: 4,
///     ..RegistryConfig::default()
/// };
/// assert_eq!(config.version, "0.2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Display name reported by `/api/server/info`.
    pub name: String,
    /// Version string reported by `/`, `/api/server/info` and the push channel.
    pub version: String,
    /// Name of the (pretend) loaded world.
    pub world_name: String,
    /// Roster capacity. Must be at least 1.
    pub max_players: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: "Hytale Server (Mock)".to_string(),
            version: "0.2.0".to_string(),
            world_name: "Zone 1".to_string(),
            max_players: 10,
        }
    }
}

impl RegistryConfig {
    /// Fixes out-of-range values so the config is safe to use.
    ///
    /// Called by [`SessionRegistry::new`](crate::SessionRegistry::new).
    /// A capacity of 0 would make every join fail, so it is raised to 1.
    pub fn validated(mut self) -> Self {
        if self.max_players == 0 {
            warn!("max_players is 0, raising to 1");
            self.max_players = 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_mock_metadata() {
        let config = RegistryConfig::default();
        assert_eq!(config.name, "Hytale Server (Mock)");
        assert_eq!(config.world_name, "Zone 1");
        assert_eq!(config.max_players, 10);
    }

    #[test]
    fn test_validated_raises_zero_capacity() {
        let config = RegistryConfig {
            max_players: 0,
            ..RegistryConfig::default()
        }
        .validated();
        assert_eq!(config.max_players, 1);
    }

    #[test]
    fn test_validated_keeps_positive_capacity() {
        let config = RegistryConfig {
            max_players: 64,
            ..RegistryConfig::default()
        }
        .validated();
        assert_eq!(config.max_players, 64);
    }
}
