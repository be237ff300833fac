//! Lobby capacity and expiry configuration.

use std::time::Duration;

/// Configuration shared by every lobby the registry creates.
///
/// The defaults follow the reference deployment: two players minimum
/// (implied by "one per faction" anyway), no participant cap, at most ten
/// concurrent lobbies, and a one-hour expiry for lobbies that never start.
#[derive(Debug, Clone)]
pub struct LobbyConfig {
    /// Minimum participants before the leader may start.
    /// The per-faction minimum (one on each side) applies regardless.
    pub min_players: usize,

    /// Optional participant cap. `None` means the core enforces no upper
    /// bound; joins beyond a configured limit fail with
    /// [`LobbyError::CapacityExceeded`](crate::LobbyError::CapacityExceeded).
    pub max_participants: Option<usize>,

    /// Maximum number of concurrent lobbies in the registry.
    pub max_lobbies: usize,

    /// How long a waiting lobby may sit idle before the expiry sweep
    /// removes it. Started lobbies never expire.
    pub lobby_timeout: Duration,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_participants: None,
            max_lobbies: 10,
            lobby_timeout: Duration::from_secs(3600),
        }
    }
}
