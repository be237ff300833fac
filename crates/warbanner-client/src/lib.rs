//! Client library for Warbanner lobbies.
//!
//! Four pieces: the HTTP [`ApiClient`], the device-local [`IdentityStore`]
//! (which lobby am I in, as whom, in what role), character import parsing,
//! and the polling [`SyncLoop`] that keeps a [`LobbyView`] converged with
//! the server.

mod api;
mod character;
mod error;
mod identity;
mod sync;

pub use api::ApiClient;
pub use character::{CharacterImport, parse_character};
pub use error::ClientError;
pub use identity::{Identity, IdentityStore, Role};
pub use sync::{DEFAULT_POLL_INTERVAL, LobbyView, StatusSource, SyncHandle, SyncLoop, SyncState};
