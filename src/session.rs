//! Playthrough orchestration.
//!
//! [`PlaythroughSession`] wires the content provider, seeder, bracket state
//! machine, both persistence layers and the winner recorder into one driver
//! the hosting UI talks to. Every accepted pick returns a [`SessionEvent`]
//! describing the transition, so the UI moves between matches in-process
//! rather than re-rendering from scratch.

use log::warn;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::bracket::errors::BracketError;
use crate::bracket::models::{Candidate, GameId, OwnerId, RoundSize, Snapshot};
use crate::bracket::seeder::select_round;
use crate::bracket::state_machine::{Bracket, PickOutcome, Side};
use crate::content::{ContentError, ContentProvider};
use crate::persistence::local::{KeyValueStore, LocalSnapshotStore};
use crate::persistence::resume::{ResumeRegistry, check_content};
use crate::records::recorder::WinnerRecorder;

/// Default hand-off window between matches; picks landing inside it are
/// rejected, matching the visual transition
pub const DEFAULT_TRANSITION_WINDOW: Duration = Duration::from_millis(350);

/// Errors starting or resuming a playthrough
#[derive(Debug, Error)]
pub enum SessionError {
    /// Bracket engine rejected the operation
    #[error(transparent)]
    Bracket(#[from] BracketError),

    /// Content provider failed
    #[error(transparent)]
    Content(#[from] ContentError),

    /// No usable snapshot to resume
    #[error("no snapshot to resume for game {0}")]
    NothingToResume(GameId),
}

/// Static configuration for one playthrough
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Game being played
    pub game_id: GameId,
    /// Owner, when durable resume should be kept up to date
    pub owner_id: Option<OwnerId>,
    /// Game title carried on snapshots
    pub title: String,
    /// Game description carried on snapshots
    pub description: String,
    /// Debounce window between accepted picks
    pub transition_window: Duration,
}

impl SessionConfig {
    /// Configuration with the default transition window and no owner
    pub fn new(game_id: GameId, title: impl Into<String>) -> Self {
        Self {
            game_id,
            owner_id: None,
            title: title.into(),
            description: String::new(),
            transition_window: DEFAULT_TRANSITION_WINDOW,
        }
    }

    /// Attach an owner for durable cross-device resume
    #[must_use]
    pub fn with_owner(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Override the debounce window (tests pass `Duration::ZERO`)
    #[must_use]
    pub fn with_transition_window(mut self, window: Duration) -> Self {
        self.transition_window = window;
        self
    }

    /// Set the snapshot description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// What an accepted pick did, for the hosting UI
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Same round, next pair up
    NextMatch { pair: (Candidate, Candidate) },
    /// New round started
    NewRound {
        size: usize,
        pair: (Candidate, Candidate),
    },
    /// Tournament finished
    Finished { winner: Candidate },
}

/// One user's playthrough of one game.
///
/// Progress is persisted after every accepted pick: always to the local
/// slot, and to the durable registry when an owner is attached. Persistence
/// is best-effort; a failed write is logged and the playthrough continues
/// (the next reload simply cannot recover that progress). The winner is
/// recorded exactly once, on the finishing transition, and recording
/// failures never block the local result.
pub struct PlaythroughSession<S: KeyValueStore> {
    config: SessionConfig,
    bracket: Bracket,
    local: LocalSnapshotStore<S>,
    registry: Option<Arc<dyn ResumeRegistry>>,
    recorder: WinnerRecorder,
    last_pick_at: Option<Instant>,
}

impl<S: KeyValueStore> PlaythroughSession<S> {
    /// Seed a fresh bracket and start a playthrough.
    ///
    /// # Errors
    ///
    /// * `SessionError::Content` - the game's content could not be fetched
    /// * `SessionError::Bracket` - seeding was rejected (pool/round size)
    pub async fn start<R: Rng + ?Sized>(
        config: SessionConfig,
        provider: &dyn ContentProvider,
        size: RoundSize,
        rng: &mut R,
        local: LocalSnapshotStore<S>,
        registry: Option<Arc<dyn ResumeRegistry>>,
        recorder: WinnerRecorder,
    ) -> Result<Self, SessionError> {
        let pool = provider.game_content(config.game_id).await?;
        let round = select_round(&pool, size, rng)?;
        let bracket = Bracket::new(config.game_id, round)?;

        let mut session = Self {
            config,
            bracket,
            local,
            registry,
            recorder,
            last_pick_at: None,
        };
        session.persist().await;
        Ok(session)
    }

    /// Resume from the local slot.
    ///
    /// # Errors
    ///
    /// * `SessionError::NothingToResume` - slot empty, another game's
    ///   bracket, or an unreadable payload (already discarded)
    /// * `SessionError::Bracket` - content has shrunk under the snapshot
    pub async fn resume_local(
        config: SessionConfig,
        provider: &dyn ContentProvider,
        mut local: LocalSnapshotStore<S>,
        registry: Option<Arc<dyn ResumeRegistry>>,
        recorder: WinnerRecorder,
    ) -> Result<Self, SessionError> {
        let snapshot = local
            .load(config.game_id)
            .ok_or(SessionError::NothingToResume(config.game_id))?;
        Self::resume(config, provider, snapshot, local, registry, recorder).await
    }

    /// Resume from a snapshot (typically one listed by the durable registry).
    ///
    /// The snapshot is re-validated against the game's current content; if
    /// previously selected candidates no longer exist the resume fails with
    /// `BracketError::ContentMismatch` and the caller falls back to round
    /// selection.
    ///
    /// # Errors
    ///
    /// * `SessionError::Bracket` - game mismatch, shrunk content, or an
    ///   invariant-violating state
    /// * `SessionError::Content` - the game's content could not be fetched
    pub async fn resume(
        config: SessionConfig,
        provider: &dyn ContentProvider,
        snapshot: Snapshot,
        local: LocalSnapshotStore<S>,
        registry: Option<Arc<dyn ResumeRegistry>>,
        recorder: WinnerRecorder,
    ) -> Result<Self, SessionError> {
        if snapshot.game_id != config.game_id {
            return Err(BracketError::GameMismatch {
                expected: config.game_id,
                found: snapshot.game_id,
            }
            .into());
        }

        let content = provider.game_content(config.game_id).await?;
        check_content(&snapshot, &content)?;
        let bracket = Bracket::from_state(snapshot.state)?;

        Ok(Self {
            config,
            bracket,
            local,
            registry,
            recorder,
            last_pick_at: None,
        })
    }

    /// The pair contesting the current match.
    ///
    /// # Errors
    ///
    /// * `BracketError::AlreadyFinished` / `BracketError::NoActiveMatch`
    pub fn current_pair(&self) -> Result<(&Candidate, &Candidate), BracketError> {
        self.bracket.current_pair()
    }

    /// Round size label for the round about to be played
    #[must_use]
    pub fn display_round_size(&self) -> usize {
        self.bracket.display_round_size()
    }

    /// Whether the tournament has finished
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.bracket.is_finished()
    }

    /// The bracket's current state
    #[must_use]
    pub fn state(&self) -> &crate::bracket::models::BracketState {
        self.bracket.state()
    }

    /// Tournament winner, once finished
    #[must_use]
    pub fn winner(&self) -> Option<&Candidate> {
        self.bracket.winner()
    }

    /// Accept one pick and advance the playthrough.
    ///
    /// A pick arriving while the previous transition is still settling is
    /// rejected with `BracketError::TransitionInProgress`, never queued.
    ///
    /// # Errors
    ///
    /// * `BracketError::TransitionInProgress` - pick landed inside the window
    /// * `BracketError::AlreadyFinished` / `BracketError::NoActiveMatch`
    pub async fn pick(&mut self, side: Side) -> Result<SessionEvent, BracketError> {
        if let Some(at) = self.last_pick_at {
            if at.elapsed() < self.config.transition_window {
                return Err(BracketError::TransitionInProgress);
            }
        }

        let outcome = self.bracket.record_pick(side)?;
        self.last_pick_at = Some(Instant::now());

        match outcome {
            PickOutcome::NextMatch => {
                self.persist().await;
                let pair = self.owned_pair()?;
                Ok(SessionEvent::NextMatch { pair })
            }
            PickOutcome::NewRound { size } => {
                self.persist().await;
                let pair = self.owned_pair()?;
                Ok(SessionEvent::NewRound { size, pair })
            }
            PickOutcome::Finished { winner } => {
                self.finish(&winner).await;
                Ok(SessionEvent::Finished { winner })
            }
        }
    }

    /// Drop all persisted traces of this playthrough
    pub async fn abandon(&mut self) {
        self.local.clear();
        if let (Some(registry), Some(owner_id)) = (&self.registry, self.config.owner_id) {
            if let Err(err) = registry.delete(owner_id, self.config.game_id).await {
                warn!("failed to delete durable snapshot: {err}");
            }
        }
    }

    fn owned_pair(&self) -> Result<(Candidate, Candidate), BracketError> {
        let (left, right) = self.bracket.current_pair()?;
        Ok((left.clone(), right.clone()))
    }

    /// Best-effort snapshot write after a transition. Failures cost resume,
    /// never the running playthrough.
    async fn persist(&mut self) {
        let snapshot = Snapshot::new(
            self.bracket.state().clone(),
            self.config.owner_id,
            self.config.title.clone(),
            self.config.description.clone(),
        );

        if let Err(err) = self.local.save(&snapshot) {
            warn!("failed to write local snapshot: {err}");
        }

        if let (Some(registry), Some(owner_id)) = (&self.registry, self.config.owner_id) {
            if let Err(err) = registry.save(owner_id, &snapshot).await {
                warn!("failed to write durable snapshot: {err}");
            }
        }
    }

    /// Completion: snapshots are superseded, the winner is emitted once.
    /// Recording is fire-and-forget; a storage failure only costs leaderboard
    /// freshness, the finished bracket stays viewable.
    async fn finish(&mut self, winner: &Candidate) {
        self.abandon().await;

        if let Err(err) = self
            .recorder
            .record_winner(self.config.game_id, winner)
            .await
        {
            warn!("failed to record winner for game {}: {err}", self.config.game_id);
        }
    }
}
