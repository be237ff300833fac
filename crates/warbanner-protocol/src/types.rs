//! Request and response bodies for the lobby operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use warbanner_faction::Faction;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque unique identifier for a lobby session.
///
/// Generated server-side at creation, immutable afterwards. Clients treat
/// it as an opaque string — the format (two 4-character groups joined by a
/// dash, e.g. `k3tz-9qwd`) is a server implementation detail.
///
/// `#[serde(transparent)]` keeps it a plain JSON string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbyId(pub String);

impl LobbyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LobbyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Lobby status
// ---------------------------------------------------------------------------

/// Lifecycle status of a lobby.
///
/// The transition is monotonic and happens exactly once:
///
/// ```text
/// Waiting ──(leader starts)──→ Started
/// ```
///
/// No lobby ever regresses to `Waiting`. Serialized lowercase — the status
/// poll returns `"waiting"` or `"started"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LobbyStatus {
    Waiting,
    Started,
}

impl LobbyStatus {
    /// Returns `true` if the lobby is still accepting joins.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }
}

impl fmt::Display for LobbyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Started => write!(f, "started"),
        }
    }
}

// ---------------------------------------------------------------------------
// Participants and credentials
// ---------------------------------------------------------------------------

/// A participant as exposed in status responses: display name and faction,
/// nothing else. The raw character payload never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub name: String,
    pub faction: Faction,
}

/// A generated login for the external match host.
///
/// Returned exactly once, in the start response. Status polls never carry
/// credentials, so observers who poll a started lobby cannot harvest them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Operation bodies
// ---------------------------------------------------------------------------

/// `POST /lobby/create` request.
///
/// `faction` is a plain string here (not [`Faction`]) so that an unknown
/// value surfaces as a structured `{"error": ...}` from our validation
/// instead of a framework-level deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyRequest {
    pub leader_name: String,
    pub faction: String,
    pub character_data: String,
}

/// `POST /lobby/create` success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyResponse {
    pub session_id: LobbyId,
}

/// `POST /lobby/:id/join` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinLobbyRequest {
    pub participant_name: String,
    pub faction: String,
    pub character_data: String,
}

/// `GET /lobby/:id/status` success response — a read-only snapshot.
///
/// `match_instance_id` is present if and only if the lobby has started.
/// There is deliberately no credentials field: credentials are returned
/// only from the start call itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: LobbyStatus,
    pub leader: String,
    pub participants: Vec<ParticipantView>,
    pub alliance_count: u32,
    pub horde_count: u32,
    pub can_start: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_instance_id: Option<u32>,
}

/// `POST /lobby/:id/start` request. Leader authorization is name-based:
/// the server compares this field to the stored leader name and nothing
/// more (explicit trust boundary, see the registry crate docs).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLobbyRequest {
    pub requester_name: String,
}

/// `POST /lobby/:id/start` success response: the match instance handle
/// and one login per participant, in participant order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLobbyResponse {
    pub match_instance_id: u32,
    pub accounts: Vec<Credential>,
}

/// `GET /lobbies` success response: ids of lobbies still accepting joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLobbiesResponse {
    pub lobbies: Vec<LobbyId>,
}

/// The failure shape for every operation.
///
/// Callers treat a present `error` field as failure regardless of the
/// transport status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// =========================================================================
// Tests
// =========================================================================
