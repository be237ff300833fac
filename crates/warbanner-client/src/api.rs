//! Thin reqwest wrapper over the lobby HTTP API.

use serde::Serialize;
use serde::de::DeserializeOwned;
use warbanner_protocol::{
    CreateLobbyRequest, CreateLobbyResponse, ErrorResponse, JoinLobbyRequest, ListLobbiesResponse,
    LobbyId, ParticipantView, StartLobbyRequest, StartLobbyResponse, StatusResponse,
};

use crate::ClientError;
use crate::sync::StatusSource;

/// HTTP client for one lobby server.
///
/// Cheap to clone — `reqwest::Client` is an `Arc` internally.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the server at `base_url`
    /// (e.g. `http://127.0.0.1:8080`, no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Creates a lobby with the caller as leader and returns its id.
    pub async fn create(&self, req: &CreateLobbyRequest) -> Result<LobbyId, ClientError> {
        let resp: CreateLobbyResponse = self.post("/lobby/create", req).await?;
        Ok(resp.session_id)
    }

    /// Joins an existing lobby; returns the server's participant echo with
    /// the classified faction.
    pub async fn join(
        &self,
        id: &LobbyId,
        req: &JoinLobbyRequest,
    ) -> Result<ParticipantView, ClientError> {
        self.post(&format!("/lobby/{id}/join"), req).await
    }

    /// Fetches the current status snapshot.
    pub async fn status(&self, id: &LobbyId) -> Result<StatusResponse, ClientError> {
        let resp = self
            .http
            .get(format!("{}/lobby/{id}/status", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }

    /// Requests the start transition on behalf of `requester`. The response
    /// is the only place match credentials ever appear.
    pub async fn start(
        &self,
        id: &LobbyId,
        requester: &str,
    ) -> Result<StartLobbyResponse, ClientError> {
        let req = StartLobbyRequest {
            requester_name: requester.to_string(),
        };
        self.post(&format!("/lobby/{id}/start"), &req).await
    }

    /// Lists lobbies still accepting players.
    pub async fn lobbies(&self) -> Result<Vec<LobbyId>, ClientError> {
        let resp = self
            .http
            .get(format!("{}/lobbies", self.base_url))
            .send()
            .await?;
        let body: ListLobbiesResponse = decode(resp).await?;
        Ok(body.lobbies)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }
}

/// The polling loop drives this client directly.
impl StatusSource for ApiClient {
    async fn fetch(&self, id: &LobbyId) -> Result<StatusResponse, ClientError> {
        self.status(id).await
    }
}

/// Decodes a response body, treating a present `error` field as failure
/// regardless of the HTTP status code.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if let Ok(failure) = serde_json::from_slice::<ErrorResponse>(&bytes) {
        return Err(ClientError::Api(failure.error));
    }
    if !status.is_success() {
        return Err(ClientError::Api(format!("unexpected status {status}")));
    }
    Ok(serde_json::from_slice(&bytes)?)
}
