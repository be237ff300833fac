//! Error types for the lobby layer.

use warbanner_protocol::LobbyId;

/// Errors that can occur during lobby operations.
///
/// Every variant is terminal for the triggering request and is surfaced
/// verbatim to the caller as a structured error — never retried
/// server-side.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LobbyError {
    /// The lobby does not exist (unknown id, or already swept).
    #[error("lobby {0} not found")]
    NotFound(LobbyId),

    /// The lobby has left the waiting state. Covers both a join against a
    /// started lobby and the losing side of a start race.
    #[error("lobby {0} has already started")]
    AlreadyStarted(LobbyId),

    /// The participant name is already taken within this lobby.
    /// Names are case-sensitive identity, scoped to one lobby.
    #[error("a player named {0} is already in lobby {1}")]
    DuplicateName(String, LobbyId),

    /// Someone other than the stored leader asked to start the match.
    #[error("only the lobby leader can start the match")]
    NotLeader,

    /// The leader asked to start before the minimum viable match exists
    /// (at least one participant on each faction).
    #[error("lobby {0} is not ready to start")]
    NotReady(LobbyId),

    /// The configured participant cap was reached.
    /// Only possible when `max_participants` is set in [`LobbyConfig`].
    ///
    /// [`LobbyConfig`]: crate::LobbyConfig
    #[error("lobby {0} is full")]
    CapacityExceeded(LobbyId),

    /// The configured lobby cap was reached; no new lobby can be created
    /// until one is swept.
    #[error("maximum number of lobbies reached")]
    AtCapacity,

    /// The lobby's command channel is closed (actor shut down mid-request).
    #[error("lobby {0} is unavailable")]
    Unavailable(LobbyId),
}
