//! Wire types for the Warbanner lobby HTTP contract.
//!
//! Everything in this crate crosses the client/server boundary as JSON.
//! The serde shapes here ARE the contract: field names are camelCase,
//! lobby status values are lowercase, and optional fields are omitted
//! (not `null`) when absent. The tests at the bottom pin those shapes —
//! a mismatch means the web front end can no longer parse our responses.

mod types;

pub use types::{
    Credential, CreateLobbyRequest, CreateLobbyResponse, ErrorResponse,
    JoinLobbyRequest, ListLobbiesResponse, LobbyId, LobbyStatus,
    ParticipantView, StartLobbyRequest, StartLobbyResponse, StatusResponse,
};
