//! Shared server state passed to each request handler.

use tokio::sync::Mutex;
use warbanner_faction::FactionTable;
use warbanner_lobby::{LobbyConfig, LobbyRegistry};

/// Shared state behind every handler. Wrapped in `Arc` by the router so it
/// can be cheaply cloned across tasks.
///
/// Per-lobby handlers hold the registry mutex only to look up or insert a
/// handle — they clone the handle out and await on it with the lock
/// released, so one slow lobby never blocks requests for the others. The
/// lobby listing and the expiry sweep are the exception: they scan every
/// lobby under the lock.
pub struct AppState {
    pub registry: Mutex<LobbyRegistry>,
    pub factions: FactionTable,
}

impl AppState {
    pub fn new(config: LobbyConfig) -> Self {
        Self {
            registry: Mutex::new(LobbyRegistry::new(config)),
            factions: FactionTable::default(),
        }
    }
}
