//! Data models for elimination brackets and their snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::{BracketError, BracketResult};

/// Game ID type
pub type GameId = i64;

/// Owner (user) ID type
pub type OwnerId = i64;

/// Media kind of a candidate
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    /// Still image
    Image,
    /// Short animated clip (e.g. gif/webm loop)
    AnimatedClip,
    /// Embedded external video
    EmbeddedVideo,
}

/// Reference to a candidate's media asset
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct MediaRef {
    /// Asset URL
    pub url: String,
    /// Asset kind
    pub kind: MediaKind,
}

/// A tournament candidate, owned by the external content provider
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Candidate {
    /// Display name
    pub name: String,
    /// Media asset
    #[serde(alias = "mediaRef", alias = "media_ref")]
    pub media: MediaRef,
}

impl Candidate {
    /// Create a new candidate
    pub fn new(name: impl Into<String>, url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            name: name.into(),
            media: MediaRef {
                url: url.into(),
                kind,
            },
        }
    }
}

/// Requested size of the opening round
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RoundSize {
    /// Use the full pool, randomly permuted
    All,
    /// Use a uniformly sampled subset of exactly this many candidates
    /// (must be a power of two >= 2)
    Of(usize),
}

/// Mutable bracket progress for a single playthrough.
///
/// Owned exclusively by the state machine while the playthrough runs;
/// anything loaded from storage must pass [`BracketState::validate`]
/// before the machine will accept it.
///
/// Serde aliases accept the field names written by older snapshot
/// backends, so snapshots from either persistence source deserialize
/// to the same canonical shape.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BracketState {
    /// Game this bracket was seeded from
    #[serde(alias = "gameId")]
    pub game_id: GameId,
    /// Candidates entering the current round, in pairing order
    #[serde(alias = "roundCandidates", alias = "items")]
    pub round_candidates: Vec<Candidate>,
    /// Winners accumulated so far in the current round
    #[serde(alias = "winners")]
    pub advancing: Vec<Candidate>,
    /// Index of the match currently being played
    #[serde(alias = "matchIndex", alias = "matchNo")]
    pub match_index: usize,
}

impl BracketState {
    /// Create the opening state for a freshly seeded round
    pub fn new(game_id: GameId, round_candidates: Vec<Candidate>) -> Self {
        Self {
            game_id,
            round_candidates,
            advancing: Vec::new(),
            match_index: 0,
        }
    }

    /// Number of matches in the current round
    #[must_use]
    pub fn total_matches(&self) -> usize {
        self.round_candidates.len() / 2
    }

    /// Check the mid-round invariants.
    ///
    /// # Errors
    ///
    /// * `BracketError::PoolTooSmall` - fewer than 2 candidates in the round
    /// * `BracketError::DuplicateCandidate` - a candidate appears twice
    /// * `BracketError::MatchIndexOutOfBounds` - match index past the round's matches
    /// * `BracketError::AdvancingMismatch` - advancing count disagrees with match index
    pub fn validate(&self) -> BracketResult<()> {
        if self.round_candidates.len() < 2 {
            return Err(BracketError::PoolTooSmall(self.round_candidates.len()));
        }

        let mut seen = HashSet::new();
        for candidate in &self.round_candidates {
            if !seen.insert((candidate.name.as_str(), candidate.media.url.as_str())) {
                return Err(BracketError::DuplicateCandidate(candidate.name.clone()));
            }
        }

        let matches = self.total_matches();
        if self.match_index >= matches {
            return Err(BracketError::MatchIndexOutOfBounds {
                index: self.match_index,
                matches,
            });
        }

        if self.advancing.len() != self.match_index {
            return Err(BracketError::AdvancingMismatch {
                advancing: self.advancing.len(),
                match_index: self.match_index,
            });
        }

        Ok(())
    }
}

/// A persisted bracket, either in the local slot or the durable registry.
///
/// `game_id` always matches the wrapped state; constructors enforce it and
/// loaders re-check it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    /// Game the bracket belongs to
    #[serde(alias = "gameId")]
    pub game_id: GameId,
    /// Owner, when saved through the durable registry
    #[serde(default, alias = "ownerId", alias = "userId")]
    pub owner_id: Option<OwnerId>,
    /// Human-readable title of the game
    pub title: String,
    /// Short description shown in resume lists
    #[serde(default, alias = "desc")]
    pub description: String,
    /// When this snapshot was written
    #[serde(alias = "savedAt")]
    pub saved_at: DateTime<Utc>,
    /// The wrapped bracket state
    #[serde(alias = "bracket")]
    pub state: BracketState,
}

impl Snapshot {
    /// Wrap a bracket state for persistence, stamping the current time
    pub fn new(
        state: BracketState,
        owner_id: Option<OwnerId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            game_id: state.game_id,
            owner_id,
            title: title.into(),
            description: description.into(),
            saved_at: Utc::now(),
            state,
        }
    }

    /// Check that the snapshot is internally consistent and usable.
    ///
    /// # Errors
    ///
    /// * `BracketError::GameMismatch` - wrapper and state disagree on the game
    /// * any error from [`BracketState::validate`]
    pub fn validate(&self) -> BracketResult<()> {
        if self.game_id != self.state.game_id {
            return Err(BracketError::GameMismatch {
                expected: self.game_id,
                found: self.state.game_id,
            });
        }
        self.state.validate()
    }
}
