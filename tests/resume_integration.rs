//! Integration tests for snapshot persistence and resume.
//!
//! These tests cover the dual persistence contract: structural round-trips
//! through both stores, cross-game rejection, corrupt payload recovery, and
//! the shrunk-content fallback on durable resume.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use favorite_cup::bracket::{BracketError, Candidate, MediaKind, RoundSize, Side};
use favorite_cup::content::StaticContent;
use favorite_cup::persistence::{
    LocalSnapshotStore, MemoryKeyValue, MemoryResumeRegistry, ResumeRegistry, SNAPSHOT_KEY,
};
use favorite_cup::persistence::local::KeyValueStore;
use favorite_cup::records::{MemoryPlayRecordStore, WinnerRecorder};
use favorite_cup::session::{PlaythroughSession, SessionConfig, SessionError};

const GAME: i64 = 3;
const OWNER: i64 = 7;

fn candidates(names: &[&str]) -> Vec<Candidate> {
    names
        .iter()
        .map(|name| {
            Candidate::new(
                *name,
                format!("https://cdn.example.com/{name}.png"),
                MediaKind::Image,
            )
        })
        .collect()
}

fn provider_for(game_id: i64, names: &[&str]) -> StaticContent {
    let mut content = StaticContent::new();
    content.insert(game_id, candidates(names));
    content
}

fn config(game_id: i64) -> SessionConfig {
    SessionConfig::new(game_id, "Favorite Mascot")
        .with_owner(OWNER)
        .with_transition_window(Duration::ZERO)
}

fn recorder() -> WinnerRecorder {
    WinnerRecorder::new(Arc::new(MemoryPlayRecordStore::new()))
}

#[tokio::test]
async fn test_durable_round_trip_preserves_state() {
    let provider = provider_for(GAME, &["a", "b", "c", "d", "e", "f", "g", "h"]);
    let registry: Arc<dyn ResumeRegistry> = Arc::new(MemoryResumeRegistry::new());
    let mut rng = StdRng::seed_from_u64(5);

    let mut session = PlaythroughSession::start(
        config(GAME),
        &provider,
        RoundSize::All,
        &mut rng,
        LocalSnapshotStore::new(MemoryKeyValue::new()),
        Some(registry.clone()),
        recorder(),
    )
    .await
    .expect("start");

    session.pick(Side::Left).await.expect("pick");
    session.pick(Side::Right).await.expect("pick");

    let listed = registry.list(OWNER).await.expect("list");
    assert_eq!(listed.len(), 1);
    let snapshot = listed[0].clone();
    assert_eq!(snapshot.game_id, GAME);
    assert_eq!(snapshot.state.match_index, 2);
    assert_eq!(snapshot.state.advancing.len(), 2);

    // Resuming yields a bracket structurally identical to the saved one.
    let resumed = PlaythroughSession::resume(
        config(GAME),
        &provider,
        snapshot.clone(),
        LocalSnapshotStore::new(MemoryKeyValue::new()),
        Some(registry),
        recorder(),
    )
    .await
    .expect("resume");

    let (left, right) = resumed.current_pair().expect("pair");
    assert_eq!(left, &snapshot.state.round_candidates[4]);
    assert_eq!(right, &snapshot.state.round_candidates[5]);
}

#[tokio::test]
async fn test_local_round_trip_through_session() {
    let provider = provider_for(GAME, &["a", "b", "c", "d"]);
    let mut kv = MemoryKeyValue::new();
    let mut rng = StdRng::seed_from_u64(9);

    let saved_state = {
        let mut session = PlaythroughSession::start(
            config(GAME),
            &provider,
            RoundSize::All,
            &mut rng,
            LocalSnapshotStore::new(&mut kv),
            None,
            recorder(),
        )
        .await
        .expect("start");
        session.pick(Side::Left).await.expect("pick");
        session.state().clone()
    };

    // Same-device restart: a fresh session over the same key-value backend.
    let resumed = PlaythroughSession::resume_local(
        config(GAME),
        &provider,
        LocalSnapshotStore::new(&mut kv),
        None,
        recorder(),
    )
    .await
    .expect("resume from local slot");
    assert_eq!(resumed.state(), &saved_state);
}

#[tokio::test]
async fn test_resume_rejects_other_game() {
    let provider = provider_for(GAME, &["a", "b", "c", "d"]);
    let registry: Arc<dyn ResumeRegistry> = Arc::new(MemoryResumeRegistry::new());
    let mut rng = StdRng::seed_from_u64(2);

    let mut session = PlaythroughSession::start(
        config(GAME),
        &provider,
        RoundSize::All,
        &mut rng,
        LocalSnapshotStore::new(MemoryKeyValue::new()),
        Some(registry.clone()),
        recorder(),
    )
    .await
    .expect("start");
    session.pick(Side::Left).await.expect("pick");

    let snapshot = registry.list(OWNER).await.expect("list").remove(0);
    let other_provider = provider_for(GAME + 1, &["a", "b", "c", "d"]);

    let result = PlaythroughSession::resume(
        config(GAME + 1),
        &other_provider,
        snapshot,
        LocalSnapshotStore::new(MemoryKeyValue::new()),
        None,
        recorder(),
    )
    .await;
    assert!(matches!(
        result,
        Err(SessionError::Bracket(BracketError::GameMismatch { .. }))
    ));
}

#[tokio::test]
async fn test_resume_fails_on_shrunk_content() {
    let provider = provider_for(GAME, &["a", "b", "c", "d"]);
    let registry: Arc<dyn ResumeRegistry> = Arc::new(MemoryResumeRegistry::new());
    let mut rng = StdRng::seed_from_u64(4);

    let mut session = PlaythroughSession::start(
        config(GAME),
        &provider,
        RoundSize::All,
        &mut rng,
        LocalSnapshotStore::new(MemoryKeyValue::new()),
        Some(registry.clone()),
        recorder(),
    )
    .await
    .expect("start");
    session.pick(Side::Left).await.expect("pick");

    let snapshot = registry.list(OWNER).await.expect("list").remove(0);

    // Content shrank between sessions: "d" was removed from the game.
    let shrunk = provider_for(GAME, &["a", "b", "c"]);
    let result = PlaythroughSession::resume(
        config(GAME),
        &shrunk,
        snapshot,
        LocalSnapshotStore::new(MemoryKeyValue::new()),
        None,
        recorder(),
    )
    .await;
    assert!(matches!(
        result,
        Err(SessionError::Bracket(BracketError::ContentMismatch))
    ));
}

#[tokio::test]
async fn test_resume_local_with_empty_slot() {
    let provider = provider_for(GAME, &["a", "b"]);

    let result = PlaythroughSession::resume_local(
        config(GAME),
        &provider,
        LocalSnapshotStore::new(MemoryKeyValue::new()),
        None,
        recorder(),
    )
    .await;
    assert!(matches!(result, Err(SessionError::NothingToResume(_))));
}

#[tokio::test]
async fn test_resume_local_with_corrupt_slot() {
    let provider = provider_for(GAME, &["a", "b"]);
    let mut kv = MemoryKeyValue::new();
    kv.set(SNAPSHOT_KEY, "definitely not a snapshot").expect("set");

    let result = PlaythroughSession::resume_local(
        config(GAME),
        &provider,
        LocalSnapshotStore::new(kv),
        None,
        recorder(),
    )
    .await;
    // Corruption is recovered as "nothing stored", never an error.
    assert!(matches!(result, Err(SessionError::NothingToResume(_))));
}

#[tokio::test]
async fn test_abandon_clears_both_stores() {
    let provider = provider_for(GAME, &["a", "b", "c", "d"]);
    let registry: Arc<dyn ResumeRegistry> = Arc::new(MemoryResumeRegistry::new());
    let mut rng = StdRng::seed_from_u64(6);

    let mut session = PlaythroughSession::start(
        config(GAME),
        &provider,
        RoundSize::All,
        &mut rng,
        LocalSnapshotStore::new(MemoryKeyValue::new()),
        Some(registry.clone()),
        recorder(),
    )
    .await
    .expect("start");
    session.pick(Side::Left).await.expect("pick");
    assert_eq!(registry.list(OWNER).await.expect("list").len(), 1);

    session.abandon().await;
    assert!(registry.list(OWNER).await.expect("list").is_empty());
}
