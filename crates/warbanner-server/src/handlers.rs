//! Request handlers for the lobby API.
//!
//! Validation happens here, before the registry is touched: names and
//! character payloads must be non-empty after trimming, and the faction
//! string must resolve. Violations come back as 400 with the same
//! `{"error": ...}` body shape every other failure uses.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use warbanner_faction::{Faction, FactionTable};
use warbanner_lobby::{LobbyError, Participant};
use warbanner_protocol::{
    CreateLobbyRequest, CreateLobbyResponse, ErrorResponse, JoinLobbyRequest, ListLobbiesResponse,
    LobbyId, ParticipantView, StartLobbyRequest, StartLobbyResponse, StatusResponse,
};

use crate::state::AppState;

/// Every failure leaves the server as a status code plus `{"error": ...}`.
type ApiError = (StatusCode, Json<ErrorResponse>);

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /lobby/create` — creates a lobby with the caller as leader.
pub(crate) async fn create_lobby(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLobbyRequest>,
) -> Result<Json<CreateLobbyResponse>, ApiError> {
    let leader = validate_participant(
        &state.factions,
        &req.leader_name,
        &req.faction,
        &req.character_data,
    )?;

    let session_id = state
        .registry
        .lock()
        .await
        .create(leader)
        .map_err(lobby_error)?;

    Ok(Json(CreateLobbyResponse { session_id }))
}

/// `POST /lobby/:id/join` — seats a new participant; echoes back the name
/// and classified faction.
pub(crate) async fn join_lobby(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<JoinLobbyRequest>,
) -> Result<Json<ParticipantView>, ApiError> {
    let participant = validate_participant(
        &state.factions,
        &req.participant_name,
        &req.faction,
        &req.character_data,
    )?;
    let echo = ParticipantView {
        name: participant.name.clone(),
        faction: participant.faction,
    };

    let handle = lookup(&state, &id).await?;
    handle.join(participant).await.map_err(lobby_error)?;

    Ok(Json(echo))
}

/// `GET /lobby/:id/status` — read-only snapshot for the polling loop.
pub(crate) async fn lobby_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let handle = lookup(&state, &id).await?;
    let snapshot = handle.status().await.map_err(lobby_error)?;
    Ok(Json(snapshot))
}

/// `POST /lobby/:id/start` — the waiting→started transition. Leader
/// authorization is name-based by contract.
pub(crate) async fn start_lobby(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StartLobbyRequest>,
) -> Result<Json<StartLobbyResponse>, ApiError> {
    let requester = req.requester_name.trim();
    if requester.is_empty() {
        return Err(bad_request("requesterName must not be empty"));
    }

    let handle = lookup(&state, &id).await?;
    let outcome = handle.start(requester).await.map_err(lobby_error)?;

    Ok(Json(StartLobbyResponse {
        match_instance_id: outcome.match_instance_id,
        accounts: outcome.accounts,
    }))
}

/// `GET /lobbies` — ids of lobbies still accepting players.
pub(crate) async fn list_lobbies(State(state): State<Arc<AppState>>) -> Json<ListLobbiesResponse> {
    let lobbies = state.registry.lock().await.waiting_lobby_ids().await;
    Json(ListLobbiesResponse { lobbies })
}

/// `GET /healthz` — liveness probe.
pub(crate) async fn healthz() -> &'static str {
    "ok"
}

// ---------------------------------------------------------------------------
// Validation and error mapping
// ---------------------------------------------------------------------------

async fn lookup(state: &AppState, id: &str) -> Result<warbanner_lobby::LobbyHandle, ApiError> {
    let id = LobbyId::from(id);
    state.registry.lock().await.handle(&id).map_err(lobby_error)
}

fn validate_participant(
    factions: &FactionTable,
    name: &str,
    faction: &str,
    character_data: &str,
) -> Result<Participant, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(bad_request("name must not be empty"));
    }
    if character_data.trim().is_empty() {
        return Err(bad_request("characterData must not be empty"));
    }
    let faction = resolve_faction(factions, faction)?;

    Ok(Participant {
        name: name.to_string(),
        faction,
        character_data: character_data.to_string(),
    })
}

/// Resolves the wire `faction` field: the exact faction strings
/// `"Alliance"`/`"Horde"`, or a race identifier run through the classifier
/// (web clients send whichever they have on hand).
fn resolve_faction(table: &FactionTable, raw: &str) -> Result<Faction, ApiError> {
    raw.parse::<Faction>()
        .or_else(|_| table.classify(raw))
        .map_err(|_| bad_request(format!("unknown faction: {raw}")))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Maps registry errors to HTTP statuses. Registry errors are terminal for
/// the request and surfaced verbatim in the body.
fn lobby_error(err: LobbyError) -> ApiError {
    let status = match &err {
        LobbyError::NotFound(_) => StatusCode::NOT_FOUND,
        LobbyError::AlreadyStarted(_)
        | LobbyError::DuplicateName(_, _)
        | LobbyError::NotReady(_)
        | LobbyError::CapacityExceeded(_) => StatusCode::CONFLICT,
        LobbyError::NotLeader => StatusCode::FORBIDDEN,
        LobbyError::AtCapacity | LobbyError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_error_maps_to_expected_statuses() {
        let id = LobbyId::from("abcd-1234");
        let cases = [
            (LobbyError::NotFound(id.clone()), StatusCode::NOT_FOUND),
            (
                LobbyError::AlreadyStarted(id.clone()),
                StatusCode::CONFLICT,
            ),
            (
                LobbyError::DuplicateName("Arthas".into(), id.clone()),
                StatusCode::CONFLICT,
            ),
            (LobbyError::NotReady(id.clone()), StatusCode::CONFLICT),
            (
                LobbyError::CapacityExceeded(id.clone()),
                StatusCode::CONFLICT,
            ),
            (LobbyError::NotLeader, StatusCode::FORBIDDEN),
            (LobbyError::AtCapacity, StatusCode::SERVICE_UNAVAILABLE),
            (
                LobbyError::Unavailable(id),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, expected) in cases {
            let (status, body) = lobby_error(err);
            assert_eq!(status, expected);
            assert!(!body.error.is_empty());
        }
    }

    #[test]
    fn test_resolve_faction_accepts_faction_strings_and_races() {
        let table = FactionTable::default();
        assert_eq!(
            resolve_faction(&table, "Alliance").unwrap(),
            Faction::Alliance
        );
        assert_eq!(resolve_faction(&table, "Horde").unwrap(), Faction::Horde);
        assert_eq!(resolve_faction(&table, "orc").unwrap(), Faction::Horde);
        assert_eq!(
            resolve_faction(&table, "night elf").unwrap(),
            Faction::Alliance
        );
    }

    #[test]
    fn test_resolve_faction_rejects_unknown_values() {
        let table = FactionTable::default();
        let (status, body) = resolve_faction(&table, "Neutral").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("Neutral"));
    }

    #[test]
    fn test_validate_participant_trims_and_rejects_blank_fields() {
        let table = FactionTable::default();

        let ok = validate_participant(&table, "  Arthas  ", "Alliance", "{}").unwrap();
        assert_eq!(ok.name, "Arthas");

        let (status, _) = validate_participant(&table, "   ", "Alliance", "{}").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = validate_participant(&table, "Arthas", "Alliance", "  ").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
