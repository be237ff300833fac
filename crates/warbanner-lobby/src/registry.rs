//! Lobby registry: creates lobbies, routes operations by id, and sweeps
//! expired ones.
//!
//! The registry itself is NOT thread-safe — it's a plain `HashMap` owned
//! by the server behind a mutex. For per-lobby operations the lock is
//! held only to look up or insert a handle: callers clone the
//! [`LobbyHandle`] out and await on it lock-free, so one slow lobby can't
//! stall the rest. The scanning methods ([`LobbyRegistry::waiting_lobby_ids`],
//! [`LobbyRegistry::remove_expired`]) poll every lobby and are called
//! with the lock held.

use std::collections::HashMap;
use std::time::Instant;

use rand::Rng;
use warbanner_protocol::LobbyId;

use crate::lobby::spawn_lobby;
use crate::{LobbyConfig, LobbyError, LobbyHandle, Participant};

/// Command channel size per lobby actor.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Alphabet for generated lobby ids.
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

struct LobbyEntry {
    handle: LobbyHandle,
    created_at: Instant,
}

/// Tracks every active lobby. The single authoritative process-wide
/// owner of lobby handles — sharding and replication are out of scope.
pub struct LobbyRegistry {
    lobbies: HashMap<LobbyId, LobbyEntry>,
    config: LobbyConfig,
}

impl LobbyRegistry {
    pub fn new(config: LobbyConfig) -> Self {
        Self {
            lobbies: HashMap::new(),
            config,
        }
    }

    /// Creates a new lobby with `leader` as its first participant and
    /// returns the generated id.
    ///
    /// Leader names are lobby-scoped: the same name can lead any number
    /// of different lobbies.
    ///
    /// # Errors
    /// Returns [`LobbyError::AtCapacity`] when the configured lobby cap
    /// is reached.
    pub fn create(&mut self, leader: Participant) -> Result<LobbyId, LobbyError> {
        if self.lobbies.len() >= self.config.max_lobbies {
            return Err(LobbyError::AtCapacity);
        }

        // Collision odds on an 8-char id are negligible, but the retry
        // costs nothing.
        let mut id = generate_lobby_id();
        while self.lobbies.contains_key(&id) {
            id = generate_lobby_id();
        }

        let handle = spawn_lobby(
            id.clone(),
            self.config.clone(),
            leader,
            DEFAULT_CHANNEL_SIZE,
        );
        self.lobbies.insert(
            id.clone(),
            LobbyEntry {
                handle,
                created_at: Instant::now(),
            },
        );

        tracing::info!(lobby_id = %id, "lobby created");
        Ok(id)
    }

    /// Returns a cloned handle for the given lobby.
    ///
    /// Callers drop the registry lock before awaiting on the handle.
    pub fn handle(&self, id: &LobbyId) -> Result<LobbyHandle, LobbyError> {
        self.lobbies
            .get(id)
            .map(|entry| entry.handle.clone())
            .ok_or_else(|| LobbyError::NotFound(id.clone()))
    }

    /// Lists the ids of lobbies that are still accepting joins.
    ///
    /// Lobbies that fail to respond (shutting down) are silently skipped.
    pub async fn waiting_lobby_ids(&self) -> Vec<LobbyId> {
        let mut ids = Vec::new();
        for entry in self.lobbies.values() {
            if let Ok(snap) = entry.handle.status().await {
                if snap.status.is_joinable() {
                    ids.push(entry.handle.lobby_id().clone());
                }
            }
        }
        ids
    }

    /// Removes waiting lobbies older than the configured timeout.
    ///
    /// Started lobbies never expire — once handed to the match host they
    /// live until the process does. Call this periodically from a sweep
    /// task. Returns the ids that were removed.
    pub async fn remove_expired(&mut self) -> Vec<LobbyId> {
        let timeout = self.config.lobby_timeout;
        let mut expired = Vec::new();

        for (id, entry) in &self.lobbies {
            if entry.created_at.elapsed() <= timeout {
                continue;
            }
            match entry.handle.status().await {
                Ok(snap) if !snap.status.is_joinable() => {}
                // Waiting past the deadline, or already unreachable.
                _ => expired.push(id.clone()),
            }
        }

        for id in &expired {
            if let Some(entry) = self.lobbies.remove(id) {
                let _ = entry.handle.shutdown().await;
                tracing::info!(lobby_id = %id, "expired lobby removed");
            }
        }

        expired
    }

    /// Returns the number of active lobbies (any status).
    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }
}

/// Generates a lobby id: two 4-character lowercase-alphanumeric groups
/// joined by a dash, e.g. `k3tz-9qwd`.
fn generate_lobby_id() -> LobbyId {
    let mut rng = rand::rng();
    let mut id = String::with_capacity(9);
    for i in 0..8 {
        let c = ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char;
        id.push(c);
        if i == 3 {
            id.push('-');
        }
    }
    LobbyId(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_lobby_id_format() {
        for _ in 0..100 {
            let id = generate_lobby_id();
            let s = id.as_str();
            assert_eq!(s.len(), 9);
            assert_eq!(s.as_bytes()[4], b'-');
            for (i, c) in s.chars().enumerate() {
                if i == 4 {
                    continue;
                }
                assert!(
                    c.is_ascii_lowercase() || c.is_ascii_digit(),
                    "unexpected character {c:?} in {s}"
                );
            }
        }
    }
}
