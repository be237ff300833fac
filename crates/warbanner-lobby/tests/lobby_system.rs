//! Integration tests for the lobby registry and actors.

use std::time::Duration;

use warbanner_faction::Faction;
use warbanner_lobby::{LobbyConfig, LobbyError, LobbyRegistry, Participant};
use warbanner_protocol::LobbyId;
use warbanner_protocol::LobbyStatus;

// =========================================================================
// Helpers
// =========================================================================

fn participant(name: &str, faction: Faction) -> Participant {
    Participant {
        name: name.to_string(),
        faction,
        character_data: format!("{{\"name\":\"{name}\"}}"),
    }
}

fn registry() -> LobbyRegistry {
    LobbyRegistry::new(LobbyConfig::default())
}

/// Creates a lobby with Arthas leading and Thrall joined — ready to start.
async fn ready_lobby(reg: &mut LobbyRegistry) -> LobbyId {
    let id = reg
        .create(participant("Arthas", Faction::Alliance))
        .expect("create should succeed");
    let handle = reg.handle(&id).unwrap();
    handle
        .join(participant("Thrall", Faction::Horde))
        .await
        .expect("join should succeed");
    id
}

// =========================================================================
// create / status
// =========================================================================

#[tokio::test]
async fn test_create_seats_leader_and_reports_waiting() {
    let mut reg = registry();
    let id = reg
        .create(participant("Arthas", Faction::Alliance))
        .unwrap();

    let snap = reg.handle(&id).unwrap().status().await.unwrap();

    assert_eq!(snap.status, LobbyStatus::Waiting);
    assert_eq!(snap.leader, "Arthas");
    assert_eq!(snap.alliance_count, 1);
    assert_eq!(snap.horde_count, 0);
    assert!(!snap.can_start);
    assert!(snap.match_instance_id.is_none());
}

#[tokio::test]
async fn test_same_leader_name_can_create_multiple_lobbies() {
    // Names are lobby-scoped, not global.
    let mut reg = registry();
    let a = reg.create(participant("Arthas", Faction::Alliance)).unwrap();
    let b = reg.create(participant("Arthas", Faction::Alliance)).unwrap();
    assert_ne!(a, b);
    assert_eq!(reg.len(), 2);
}

#[tokio::test]
async fn test_unknown_lobby_id_returns_not_found() {
    let reg = registry();
    let result = reg.handle(&LobbyId::from("nope-nope"));
    assert!(matches!(result, Err(LobbyError::NotFound(_))));
}

#[tokio::test]
async fn test_create_beyond_lobby_cap_fails_at_capacity() {
    let mut reg = LobbyRegistry::new(LobbyConfig {
        max_lobbies: 2,
        ..LobbyConfig::default()
    });
    reg.create(participant("A", Faction::Alliance)).unwrap();
    reg.create(participant("B", Faction::Horde)).unwrap();

    let result = reg.create(participant("C", Faction::Alliance));
    assert!(matches!(result, Err(LobbyError::AtCapacity)));
}

// =========================================================================
// join
// =========================================================================

#[tokio::test]
async fn test_join_updates_counts_and_can_start() {
    let mut reg = registry();
    let id = ready_lobby(&mut reg).await;

    let snap = reg.handle(&id).unwrap().status().await.unwrap();
    assert_eq!(snap.alliance_count, 1);
    assert_eq!(snap.horde_count, 1);
    assert!(snap.can_start);
}

#[tokio::test]
async fn test_join_duplicate_name_is_rejected() {
    let mut reg = registry();
    let id = ready_lobby(&mut reg).await;
    let handle = reg.handle(&id).unwrap();

    let result = handle.join(participant("Thrall", Faction::Horde)).await;
    assert!(matches!(result, Err(LobbyError::DuplicateName(_, _))));

    // The lobby is unchanged.
    let snap = handle.status().await.unwrap();
    assert_eq!(snap.participants.len(), 2);
}

#[tokio::test]
async fn test_join_after_start_is_rejected() {
    let mut reg = registry();
    let id = ready_lobby(&mut reg).await;
    let handle = reg.handle(&id).unwrap();
    handle.start("Arthas").await.unwrap();

    let result = handle.join(participant("Jaina", Faction::Alliance)).await;
    assert!(matches!(result, Err(LobbyError::AlreadyStarted(_))));
}

// =========================================================================
// start
// =========================================================================

#[tokio::test]
async fn test_start_by_non_leader_is_rejected() {
    let mut reg = registry();
    let id = ready_lobby(&mut reg).await;
    let handle = reg.handle(&id).unwrap();

    let result = handle.start("Thrall").await;
    assert!(matches!(result, Err(LobbyError::NotLeader)));
}

#[tokio::test]
async fn test_start_before_ready_is_rejected() {
    let mut reg = registry();
    let id = reg
        .create(participant("Arthas", Faction::Alliance))
        .unwrap();
    let handle = reg.handle(&id).unwrap();

    let result = handle.start("Arthas").await;
    assert!(matches!(result, Err(LobbyError::NotReady(_))));
}

#[tokio::test]
async fn test_start_returns_instance_and_credentials() {
    let mut reg = registry();
    let id = ready_lobby(&mut reg).await;
    let handle = reg.handle(&id).unwrap();

    let outcome = handle.start("Arthas").await.unwrap();

    assert!(outcome.match_instance_id >= 100_000);
    assert_eq!(outcome.accounts.len(), 2);

    let snap = handle.status().await.unwrap();
    assert_eq!(snap.status, LobbyStatus::Started);
    assert_eq!(snap.match_instance_id, Some(outcome.match_instance_id));
}

#[tokio::test]
async fn test_concurrent_starts_exactly_one_wins() {
    let mut reg = registry();
    let id = ready_lobby(&mut reg).await;
    let h1 = reg.handle(&id).unwrap();
    let h2 = reg.handle(&id).unwrap();

    // Two simultaneous start requests from the leader. The actor
    // serializes them: exactly one transition, the loser sees
    // AlreadyStarted.
    let (r1, r2) = tokio::join!(h1.start("Arthas"), h2.start("Arthas"));

    let (winner, loser) = match (&r1, &r2) {
        (Ok(_), Err(_)) => (r1.unwrap(), r2.unwrap_err()),
        (Err(_), Ok(_)) => (r2.unwrap(), r1.unwrap_err()),
        other => panic!("expected exactly one success, got {other:?}"),
    };
    assert!(matches!(loser, LobbyError::AlreadyStarted(_)));

    // The recorded instance id is the winner's, stable across repeated
    // polls (idempotent read).
    let handle = reg.handle(&id).unwrap();
    for _ in 0..3 {
        let snap = handle.status().await.unwrap();
        assert_eq!(snap.status, LobbyStatus::Started);
        assert_eq!(snap.match_instance_id, Some(winner.match_instance_id));
    }
}

#[tokio::test]
async fn test_join_racing_start_lands_before_or_after_never_during() {
    // A join and a start issued together are serialized by the actor:
    // either the join lands first (and gets a credential at start) or it
    // lands second (and is rejected). Both outcomes keep the invariants.
    let mut reg = registry();
    let id = ready_lobby(&mut reg).await;
    let h1 = reg.handle(&id).unwrap();
    let h2 = reg.handle(&id).unwrap();

    let (join_result, start_result) = tokio::join!(
        h1.join(participant("Jaina", Faction::Alliance)),
        h2.start("Arthas")
    );

    let outcome = start_result.expect("start should win or follow the join");
    match join_result {
        Ok(()) => assert_eq!(outcome.accounts.len(), 3),
        Err(LobbyError::AlreadyStarted(_)) => {
            assert_eq!(outcome.accounts.len(), 2)
        }
        Err(other) => panic!("unexpected join error: {other}"),
    }
}

// =========================================================================
// expiry sweep / listing
// =========================================================================

#[tokio::test]
async fn test_remove_expired_sweeps_stale_waiting_lobbies() {
    let mut reg = LobbyRegistry::new(LobbyConfig {
        lobby_timeout: Duration::ZERO,
        ..LobbyConfig::default()
    });
    let id = reg
        .create(participant("Arthas", Faction::Alliance))
        .unwrap();

    let removed = reg.remove_expired().await;

    assert_eq!(removed, vec![id.clone()]);
    assert!(reg.is_empty());
    assert!(matches!(reg.handle(&id), Err(LobbyError::NotFound(_))));
}

#[tokio::test]
async fn test_remove_expired_spares_started_lobbies() {
    let mut reg = LobbyRegistry::new(LobbyConfig {
        lobby_timeout: Duration::ZERO,
        ..LobbyConfig::default()
    });
    let id = ready_lobby(&mut reg).await;
    reg.handle(&id).unwrap().start("Arthas").await.unwrap();

    let removed = reg.remove_expired().await;

    assert!(removed.is_empty(), "started lobbies never expire");
    assert_eq!(reg.len(), 1);
}

#[tokio::test]
async fn test_waiting_lobby_ids_excludes_started() {
    let mut reg = registry();
    let waiting = reg
        .create(participant("Uther", Faction::Alliance))
        .unwrap();
    let started = ready_lobby(&mut reg).await;
    reg.handle(&started).unwrap().start("Arthas").await.unwrap();

    let ids = reg.waiting_lobby_ids().await;

    assert_eq!(ids, vec![waiting]);
}
