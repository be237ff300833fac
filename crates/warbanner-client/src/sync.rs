//! Polling synchronization loop.
//!
//! The server pushes nothing; clients converge by polling the status
//! endpoint on a fixed interval and reconciling the returned snapshot into
//! a local [`LobbyView`]. The loop is a small state machine:
//!
//! ```text
//! Idle ──(run)──→ Polling ──(started observed | stop signal)──→ Stopped
//! ```
//!
//! Once stopped, no further tick fires. Fetch failures are transient by
//! contract: logged at debug level and retried on the next tick, never
//! escalated and never backed off.

use std::time::Duration;

use tokio::sync::watch;
use warbanner_protocol::{LobbyId, LobbyStatus, ParticipantView, StatusResponse};

use crate::ClientError;

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Where status snapshots come from. Implemented by the HTTP client;
/// scripted in tests.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch(&self, id: &LobbyId) -> Result<StatusResponse, ClientError>;
}

/// Lifecycle of a sync loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Polling,
    Stopped,
}

/// The client-side picture of a lobby, reconciled from the latest
/// snapshot. `is_leader` is derived locally: the stored identity name
/// compared against the leader the server reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyView {
    pub status: LobbyStatus,
    pub leader: String,
    pub participants: Vec<ParticipantView>,
    pub alliance_count: u32,
    pub horde_count: u32,
    pub can_start: bool,
    pub is_leader: bool,
    pub match_instance_id: Option<u32>,
}

impl LobbyView {
    fn reconcile(snapshot: StatusResponse, local_name: &str) -> Self {
        Self {
            is_leader: snapshot.leader == local_name,
            status: snapshot.status,
            leader: snapshot.leader,
            participants: snapshot.participants,
            alliance_count: snapshot.alliance_count,
            horde_count: snapshot.horde_count,
            can_start: snapshot.can_start,
            match_instance_id: snapshot.match_instance_id,
        }
    }
}

/// Observer side of a running sync loop. Dropping it stops the loop.
pub struct SyncHandle {
    stop_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<SyncState>,
    view_rx: watch::Receiver<Option<LobbyView>>,
}

impl SyncHandle {
    /// Signals the loop to stop. Idempotent. A start request already in
    /// flight server-side is not rolled back.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub fn state(&self) -> SyncState {
        *self.state_rx.borrow()
    }

    /// The most recently reconciled view, if any tick has succeeded yet.
    pub fn view(&self) -> Option<LobbyView> {
        self.view_rx.borrow().clone()
    }

    /// Waits for the next view update. Returns `false` once the loop has
    /// terminated and no further update will come.
    pub async fn changed(&mut self) -> bool {
        self.view_rx.changed().await.is_ok()
    }
}

/// The polling loop itself. Construct with [`SyncLoop::new`], then drive
/// it with [`run`](Self::run) (typically inside `tokio::spawn`).
pub struct SyncLoop<S> {
    source: S,
    lobby_id: LobbyId,
    local_name: String,
    interval: Duration,
    stop_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<SyncState>,
    view_tx: watch::Sender<Option<LobbyView>>,
}

impl<S: StatusSource> SyncLoop<S> {
    pub fn new(
        source: S,
        lobby_id: LobbyId,
        local_name: impl Into<String>,
        interval: Duration,
    ) -> (Self, SyncHandle) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(SyncState::Idle);
        let (view_tx, view_rx) = watch::channel(None);

        let sync = Self {
            source,
            lobby_id,
            local_name: local_name.into(),
            interval,
            stop_rx,
            state_tx,
            view_tx,
        };
        let handle = SyncHandle {
            stop_tx,
            state_rx,
            view_rx,
        };
        (sync, handle)
    }

    /// Runs until the lobby starts or the loop is stopped.
    ///
    /// Returns the match instance id when the terminal `started` snapshot
    /// was observed, `None` when stopped by signal or handle drop. Either
    /// way the loop is `Stopped` afterwards and no further tick fires.
    pub async fn run(mut self) -> Option<u32> {
        let _ = self.state_tx.send(SyncState::Polling);
        tracing::debug!(lobby_id = %self.lobby_id, "sync loop polling");

        let mut ticker = tokio::time::interval(self.interval);
        let outcome = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.source.fetch(&self.lobby_id).await {
                        Ok(snapshot) => {
                            let view =
                                LobbyView::reconcile(snapshot, &self.local_name);
                            let terminal = view.status == LobbyStatus::Started;
                            let instance_id = view.match_instance_id;
                            let _ = self.view_tx.send(Some(view));
                            if terminal {
                                break instance_id;
                            }
                        }
                        Err(e) => {
                            // Transient: retry on the next tick.
                            tracing::debug!(
                                lobby_id = %self.lobby_id,
                                error = %e,
                                "status poll failed"
                            );
                        }
                    }
                }
                changed = self.stop_rx.changed() => {
                    // A closed channel means the handle is gone; both
                    // cases stop the loop.
                    if changed.is_err() || *self.stop_rx.borrow() {
                        break None;
                    }
                }
            }
        };

        let _ = self.state_tx.send(SyncState::Stopped);
        tracing::debug!(lobby_id = %self.lobby_id, "sync loop stopped");
        outcome
    }
}

// =========================================================================
// Tests
// =========================================================================
