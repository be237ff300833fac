//! Authoritative lobby state for Warbanner.
//!
//! This crate is the single source of truth consulted by every protocol
//! handler. Each lobby runs as an isolated Tokio task (actor model) that
//! owns its state outright — mutating operations are serialized through
//! the lobby's command channel, so a join racing a start, or two racing
//! starts, always observe a consistent snapshot. Different lobbies never
//! contend with each other.
//!
//! # Key types
//!
//! - [`LobbyRegistry`] — creates lobbies, routes operations by id
//! - [`LobbyHandle`] — send commands to a running lobby actor
//! - [`LobbyState`] — the pure state machine inside the actor
//! - [`LobbyConfig`] — capacity and expiry settings
//!
//! # Trust boundary
//!
//! Leader authorization is name-based: [`LobbyState::start`] compares the
//! requester's name to the stored leader name and nothing more. Any client
//! that learns the leader's name can issue a start request. This is a
//! documented design property of the protocol, not an oversight.

mod config;
mod error;
mod lobby;
mod registry;
mod state;

pub use config::LobbyConfig;
pub use error::LobbyError;
pub use lobby::{LobbyHandle, spawn_lobby};
pub use registry::LobbyRegistry;
pub use state::{LobbyState, Participant, StartOutcome};
