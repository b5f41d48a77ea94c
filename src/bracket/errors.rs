//! Bracket error types.

use thiserror::Error;

use super::models::GameId;

/// Errors raised by seeding and bracket progression
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    /// Pool too small to run a tournament
    #[error("need at least 2 candidates, got {0}")]
    PoolTooSmall(usize),

    /// Requested round size is not a power of two >= 2
    #[error("round size must be a power of two >= 2, got {0}")]
    InvalidRoundSize(usize),

    /// Requested round size exceeds the pool
    #[error("round size {requested} exceeds pool size {available}")]
    RoundSizeExceedsPool { requested: usize, available: usize },

    /// Pick attempted with no active match
    #[error("no active match")]
    NoActiveMatch,

    /// Pick attempted after the bracket finished
    #[error("bracket already finished")]
    AlreadyFinished,

    /// Pick arrived while the previous match hand-off is still settling
    #[error("previous match still settling")]
    TransitionInProgress,

    /// Snapshot references candidates missing from the game's current content
    #[error("snapshot references candidates missing from game content")]
    ContentMismatch,

    /// Snapshot belongs to a different game
    #[error("snapshot is for game {found}, expected {expected}")]
    GameMismatch { expected: GameId, found: GameId },

    /// Candidate appears more than once in a round
    #[error("duplicate candidate in round: {0}")]
    DuplicateCandidate(String),

    /// Stored state violates the mid-round invariants
    #[error("invalid bracket state: match index {index} out of bounds for {matches} matches")]
    MatchIndexOutOfBounds { index: usize, matches: usize },

    /// Stored state violates the mid-round invariants
    #[error("invalid bracket state: {advancing} advancing candidates at match index {match_index}")]
    AdvancingMismatch { advancing: usize, match_index: usize },
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
