//! Read-only boundary to the external content provider.
//!
//! The engine never owns candidates; it reads a game's current content here
//! and re-validates resumed brackets against it.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::bracket::models::{Candidate, GameId};

/// Content provider errors
#[derive(Debug, Error)]
pub enum ContentError {
    /// No such game
    #[error("game {0} not found")]
    GameNotFound(GameId),

    /// Provider could not be reached
    #[error("content provider unavailable: {0}")]
    Unavailable(String),
}

/// Result type for content operations
pub type ContentResult<T> = Result<T, ContentError>;

/// Read-only access to a game's candidate pool
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Fetch the game's current candidates
    async fn game_content(&self, game_id: GameId) -> ContentResult<Vec<Candidate>>;
}

/// In-memory content provider for tests and headless use
#[derive(Debug, Default)]
pub struct StaticContent {
    games: HashMap<GameId, Vec<Candidate>>,
}

impl StaticContent {
    /// Create an empty provider
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a game's candidate pool, replacing any existing one
    pub fn insert(&mut self, game_id: GameId, candidates: Vec<Candidate>) {
        self.games.insert(game_id, candidates);
    }
}

#[async_trait]
impl ContentProvider for StaticContent {
    async fn game_content(&self, game_id: GameId) -> ContentResult<Vec<Candidate>> {
        self.games
            .get(&game_id)
            .cloned()
            .ok_or(ContentError::GameNotFound(game_id))
    }
}
