//! Device-local identity store.
//!
//! A small JSON file mapping lobby id → the role and display name this
//! device used for it, written on successful create/join and read back on
//! reload to re-derive the local role. Purely a UI hint: the server
//! re-validates leadership by name on every start request, so losing or
//! editing this file never grants or revokes anything.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use warbanner_protocol::LobbyId;

use crate::ClientError;

/// The role this device holds in a lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Leader,
    Participant,
}

/// What we remember about one lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub role: Role,
    pub name: String,
}

/// File-backed map of lobby id → [`Identity`].
pub struct IdentityStore {
    path: PathBuf,
    entries: HashMap<LobbyId, Identity>,
}

impl IdentityStore {
    /// Opens the store at `path`, loading existing entries. A missing file
    /// is an empty store, not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records the identity used for a lobby and persists immediately.
    pub fn record(
        &mut self,
        lobby_id: LobbyId,
        role: Role,
        name: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.entries.insert(
            lobby_id,
            Identity {
                role,
                name: name.into(),
            },
        );
        self.persist()
    }

    /// Looks up the identity recorded for a lobby, if any.
    pub fn get(&self, lobby_id: &LobbyId) -> Option<&Identity> {
        self.entries.get(lobby_id)
    }

    /// Drops the entry for a lobby (e.g. once it has expired server-side).
    pub fn forget(&mut self, lobby_id: &LobbyId) -> Result<(), ClientError> {
        if self.entries.remove(lobby_id).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), ClientError> {
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("identity.json")
    }

    #[test]
    fn test_open_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = IdentityStore::open(store_path(&dir)).unwrap();
        assert!(store.get(&LobbyId::from("abcd-1234")).is_none());
    }

    #[test]
    fn test_record_then_reopen_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let id = LobbyId::from("abcd-1234");

        let mut store = IdentityStore::open(store_path(&dir)).unwrap();
        store.record(id.clone(), Role::Leader, "Arthas").unwrap();
        drop(store);

        let reopened = IdentityStore::open(store_path(&dir)).unwrap();
        let identity = reopened.get(&id).unwrap();
        assert_eq!(identity.role, Role::Leader);
        assert_eq!(identity.name, "Arthas");
    }

    #[test]
    fn test_record_overwrites_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let id = LobbyId::from("abcd-1234");

        let mut store = IdentityStore::open(store_path(&dir)).unwrap();
        store.record(id.clone(), Role::Leader, "Arthas").unwrap();
        store
            .record(id.clone(), Role::Participant, "Jaina")
            .unwrap();

        assert_eq!(store.get(&id).unwrap().role, Role::Participant);
    }

    #[test]
    fn test_forget_removes_entry_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let id = LobbyId::from("abcd-1234");

        let mut store = IdentityStore::open(store_path(&dir)).unwrap();
        store.record(id.clone(), Role::Participant, "Thrall").unwrap();
        store.forget(&id).unwrap();

        let reopened = IdentityStore::open(store_path(&dir)).unwrap();
        assert!(reopened.get(&id).is_none());
    }

    #[test]
    fn test_entries_are_keyed_per_lobby() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = IdentityStore::open(store_path(&dir)).unwrap();
        store
            .record(LobbyId::from("aaaa-1111"), Role::Leader, "Arthas")
            .unwrap();
        store
            .record(LobbyId::from("bbbb-2222"), Role::Participant, "Arthas")
            .unwrap();

        assert_eq!(
            store.get(&LobbyId::from("aaaa-1111")).unwrap().role,
            Role::Leader
        );
        assert_eq!(
            store.get(&LobbyId::from("bbbb-2222")).unwrap().role,
            Role::Participant
        );
    }
}
