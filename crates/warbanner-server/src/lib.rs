//! HTTP API for Warbanner lobbies.
//!
//! A thin axum layer over [`warbanner_lobby`]: handlers validate the
//! request, look up the lobby handle under the registry lock, then release
//! the lock and await the lobby actor. Route table:
//!
//! ```text
//! POST /lobby/create       create a lobby, caller becomes leader
//! POST /lobby/:id/join     join an existing lobby
//! GET  /lobby/:id/status   read-only snapshot (the polling endpoint)
//! POST /lobby/:id/start    leader-only waiting→started transition
//! GET  /lobbies            ids of lobbies still accepting players
//! GET  /healthz            liveness probe
//! ```
//!
//! CORS is permissive: the API is consumed by a browser front end served
//! from a different origin.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod handlers;
mod state;

pub use state::AppState;

/// Builds the application router over shared state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/lobby/create", post(handlers::create_lobby))
        .route("/lobby/:id/join", post(handlers::join_lobby))
        .route("/lobby/:id/status", get(handlers::lobby_status))
        .route("/lobby/:id/start", post(handlers::start_lobby))
        .route("/lobbies", get(handlers::list_lobbies))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
