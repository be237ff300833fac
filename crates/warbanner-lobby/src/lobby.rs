//! Lobby actor: an isolated Tokio task that owns one lobby's state.
//!
//! Each lobby runs in its own task, communicating with the outside world
//! through an mpsc channel. No shared mutable state — the channel is the
//! serialization point, which is exactly the concurrency contract the
//! protocol needs: a join racing a start, or two racing starts, are
//! processed one at a time against a consistent snapshot, and lobbies
//! never contend with each other.

use std::sync::atomic::{AtomicU32, Ordering};

use tokio::sync::{mpsc, oneshot};
use warbanner_protocol::{LobbyId, StatusResponse};

use crate::{LobbyError, LobbyState, Participant, StartOutcome};

/// Counter for match instance ids. Starts high to stay clear of ids the
/// external match host allocates for its own queues.
static NEXT_INSTANCE_ID: AtomicU32 = AtomicU32::new(100_000);

/// Commands sent to a lobby actor through its channel.
///
/// The `oneshot::Sender` in each variant is the reply channel — the
/// caller sends a command and awaits the response on it.
pub(crate) enum LobbyCommand {
    /// Append a participant.
    Join {
        participant: Participant,
        reply: oneshot::Sender<Result<(), LobbyError>>,
    },

    /// Read-only snapshot for the status poll.
    Status {
        reply: oneshot::Sender<StatusResponse>,
    },

    /// Attempt the waiting→started transition.
    Start {
        requester: String,
        reply: oneshot::Sender<Result<StartOutcome, LobbyError>>,
    },

    /// Shut the actor down (expiry sweep).
    Shutdown,
}

/// Handle to a running lobby actor. Cheap to clone — it's an
/// `mpsc::Sender` wrapper. The `LobbyRegistry` holds one per lobby and
/// hands out clones so callers never hold the registry lock across a
/// lobby operation.
#[derive(Clone)]
pub struct LobbyHandle {
    lobby_id: LobbyId,
    sender: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    pub fn lobby_id(&self) -> &LobbyId {
        &self.lobby_id
    }

    /// Sends a join request to the lobby.
    pub async fn join(&self, participant: Participant) -> Result<(), LobbyError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LobbyCommand::Join {
                participant,
                reply: reply_tx,
            })
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id.clone()))?
    }

    /// Requests the current status snapshot.
    pub async fn status(&self) -> Result<StatusResponse, LobbyError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LobbyCommand::Status { reply: reply_tx })
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id.clone()))
    }

    /// Sends a start request on behalf of `requester`.
    ///
    /// Concurrent calls are serialized by the actor: exactly one wins the
    /// transition, the rest observe [`LobbyError::AlreadyStarted`].
    pub async fn start(&self, requester: &str) -> Result<StartOutcome, LobbyError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LobbyCommand::Start {
                requester: requester.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id.clone()))?
    }

    /// Tells the lobby actor to shut down.
    pub async fn shutdown(&self) -> Result<(), LobbyError> {
        self.sender
            .send(LobbyCommand::Shutdown)
            .await
            .map_err(|_| LobbyError::Unavailable(self.lobby_id.clone()))
    }
}

/// The actor loop. Runs inside a Tokio task until shutdown or until every
/// handle is dropped.
struct LobbyActor {
    state: LobbyState,
    receiver: mpsc::Receiver<LobbyCommand>,
}

impl LobbyActor {
    async fn run(mut self) {
        tracing::info!(lobby_id = %self.state.id(), "lobby actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LobbyCommand::Join { participant, reply } => {
                    let _ = reply.send(self.state.join(participant));
                }
                LobbyCommand::Status { reply } => {
                    let _ = reply.send(self.state.snapshot());
                }
                LobbyCommand::Start { requester, reply } => {
                    let _ = reply.send(self.handle_start(&requester));
                }
                LobbyCommand::Shutdown => {
                    tracing::info!(
                        lobby_id = %self.state.id(),
                        "lobby shutting down"
                    );
                    break;
                }
            }
        }

        tracing::info!(lobby_id = %self.state.id(), "lobby actor stopped");
    }

    fn handle_start(&mut self, requester: &str) -> Result<StartOutcome, LobbyError> {
        // Allocate the instance id only once the transition is going to
        // commit, so failed attempts don't burn ids.
        if requester != self.state.leader_name() {
            return Err(LobbyError::NotLeader);
        }
        if !self.state.status().is_joinable() {
            return Err(LobbyError::AlreadyStarted(self.state.id().clone()));
        }
        if !self.state.can_start() {
            return Err(LobbyError::NotReady(self.state.id().clone()));
        }

        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
        self.state.start(requester, instance_id)
    }
}

/// Spawns a lobby actor with the leader already seated and returns a
/// handle to it. `channel_size` bounds the command queue — if it fills,
/// senders wait.
pub fn spawn_lobby(
    id: LobbyId,
    config: crate::LobbyConfig,
    leader: Participant,
    channel_size: usize,
) -> LobbyHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = LobbyActor {
        state: LobbyState::new(id.clone(), config, leader),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    LobbyHandle {
        lobby_id: id,
        sender: tx,
    }
}
