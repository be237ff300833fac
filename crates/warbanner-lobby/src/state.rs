//! The pure lobby state machine.
//!
//! `LobbyState` is synchronous and owns no I/O — the actor in `lobby.rs`
//! wraps it and serializes access. Keeping the rules here means every
//! invariant (no duplicate names, monotonic status, derived counts) is
//! directly unit-testable without spinning up a runtime.

use rand::Rng;
use warbanner_faction::Faction;
use warbanner_protocol::{
    Credential, LobbyId, LobbyStatus, ParticipantView, StatusResponse,
};

use crate::{LobbyConfig, LobbyError};

/// A player in a lobby. The faction is fixed at join time, derived from
/// the character's race by the classifier, and never changed afterwards.
#[derive(Debug, Clone)]
pub struct Participant {
    pub name: String,
    pub faction: Faction,

    /// Raw character import blob, retained verbatim for the external
    /// match host. The core never interprets it.
    pub character_data: String,
}

/// What a successful start produces: the match instance handle and one
/// generated login per participant, in participant order.
///
/// This is the ONLY place credentials ever appear — status snapshots
/// deliberately have no credentials field.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub match_instance_id: u32,
    pub accounts: Vec<Credential>,
}

/// One lobby's complete authoritative state.
///
/// Invariants, maintained by construction:
/// - `participants` contains no duplicate `name` (case-sensitive).
/// - The leader is always `participants[0]`, appended at creation.
/// - Faction counts are derived from `participants`, never stored.
/// - `status` transitions `Waiting -> Started` exactly once;
///   `match_instance_id` is populated if and only if the status is
///   `Started`, and never changes afterwards.
#[derive(Debug)]
pub struct LobbyState {
    id: LobbyId,
    leader_name: String,
    status: LobbyStatus,
    participants: Vec<Participant>,
    match_instance_id: Option<u32>,
    config: LobbyConfig,
}

impl LobbyState {
    /// Creates a waiting lobby with the leader as its first participant.
    pub fn new(id: LobbyId, config: LobbyConfig, leader: Participant) -> Self {
        Self {
            id,
            leader_name: leader.name.clone(),
            status: LobbyStatus::Waiting,
            participants: vec![leader],
            match_instance_id: None,
            config,
        }
    }

    pub fn id(&self) -> &LobbyId {
        &self.id
    }

    pub fn status(&self) -> LobbyStatus {
        self.status
    }

    pub fn leader_name(&self) -> &str {
        &self.leader_name
    }

    fn alliance_count(&self) -> u32 {
        self.participants
            .iter()
            .filter(|p| p.faction == Faction::Alliance)
            .count() as u32
    }

    fn horde_count(&self) -> u32 {
        self.participants
            .iter()
            .filter(|p| p.faction == Faction::Horde)
            .count() as u32
    }

    /// The minimum viable match condition: still waiting, enough players,
    /// and at least one participant on each faction.
    pub fn can_start(&self) -> bool {
        self.status == LobbyStatus::Waiting
            && self.participants.len() >= self.config.min_players
            && self.alliance_count() > 0
            && self.horde_count() > 0
    }

    /// Appends a participant.
    ///
    /// Append-only while waiting. A failed join leaves the state
    /// completely untouched.
    ///
    /// # Errors
    /// - [`LobbyError::AlreadyStarted`] — lobby left the waiting state
    /// - [`LobbyError::DuplicateName`] — name already present
    /// - [`LobbyError::CapacityExceeded`] — configured cap reached
    pub fn join(&mut self, participant: Participant) -> Result<(), LobbyError> {
        if !self.status.is_joinable() {
            return Err(LobbyError::AlreadyStarted(self.id.clone()));
        }
        if self
            .participants
            .iter()
            .any(|p| p.name == participant.name)
        {
            return Err(LobbyError::DuplicateName(
                participant.name,
                self.id.clone(),
            ));
        }
        if let Some(cap) = self.config.max_participants {
            if self.participants.len() >= cap {
                return Err(LobbyError::CapacityExceeded(self.id.clone()));
            }
        }

        tracing::info!(
            lobby_id = %self.id,
            name = %participant.name,
            faction = %participant.faction,
            players = self.participants.len() + 1,
            "player joined"
        );
        self.participants.push(participant);
        Ok(())
    }

    /// Performs the one-shot `Waiting -> Started` transition.
    ///
    /// Sets the status, records the instance id, and generates one
    /// credential per participant — atomically, since the caller holds
    /// exclusive access. Credentials are generated here and nowhere else,
    /// exactly once per lobby, with usernames unique within the batch.
    ///
    /// # Errors
    /// - [`LobbyError::NotLeader`] — requester is not the stored leader
    /// - [`LobbyError::AlreadyStarted`] — a previous start won the race
    /// - [`LobbyError::NotReady`] — `can_start()` is false
    pub fn start(
        &mut self,
        requester: &str,
        instance_id: u32,
    ) -> Result<StartOutcome, LobbyError> {
        if requester != self.leader_name {
            return Err(LobbyError::NotLeader);
        }
        if self.status != LobbyStatus::Waiting {
            return Err(LobbyError::AlreadyStarted(self.id.clone()));
        }
        if !self.can_start() {
            return Err(LobbyError::NotReady(self.id.clone()));
        }

        // Participant names are case-sensitive, so sanitization can
        // collapse distinct names ("Thrall"/"thrall") onto the same
        // username. Usernames must stay unique within the batch.
        let mut used = std::collections::HashSet::new();
        let accounts: Vec<Credential> = self
            .participants
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut username = account_name(&p.name, i);
                while !used.insert(username.clone()) {
                    username.push_str(&(i + 1).to_string());
                }
                Credential {
                    username,
                    password: generate_password(),
                }
            })
            .collect();

        self.status = LobbyStatus::Started;
        self.match_instance_id = Some(instance_id);

        tracing::info!(
            lobby_id = %self.id,
            instance_id,
            players = self.participants.len(),
            "lobby started"
        );

        Ok(StartOutcome {
            match_instance_id: instance_id,
            accounts,
        })
    }

    /// Returns a read-only snapshot shaped for the status poll.
    ///
    /// Counts are recomputed from the participant list so they can never
    /// drift from it. No credentials, by design.
    pub fn snapshot(&self) -> StatusResponse {
        StatusResponse {
            status: self.status,
            leader: self.leader_name.clone(),
            participants: self
                .participants
                .iter()
                .map(|p| ParticipantView {
                    name: p.name.clone(),
                    faction: p.faction,
                })
                .collect(),
            alliance_count: self.alliance_count(),
            horde_count: self.horde_count(),
            can_start: self.can_start(),
            match_instance_id: self.match_instance_id,
        }
    }
}

/// Derives an account name from a character name: lowercased, ASCII
/// alphanumerics only. Falls back to a positional name when nothing
/// survives the filter (e.g. a fully non-ASCII name).
fn account_name(character_name: &str, index: usize) -> String {
    let sanitized: String = character_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    if sanitized.is_empty() {
        format!("player{}", index + 1)
    } else {
        sanitized
    }
}

/// Generates an 8-character hex password (32 bits of randomness).
/// Throwaway accounts for a single match — not long-lived secrets.
fn generate_password() -> String {
    let bytes: [u8; 4] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
