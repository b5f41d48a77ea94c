//! Play record and ranking data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bracket::models::{GameId, MediaRef};

/// Default number of ranking entries returned by a leaderboard query
pub const DEFAULT_RANKING_LIMIT: usize = 20;

/// Durable record of one completed playthrough's winner.
///
/// Append-only: created once per completed playthrough, never mutated.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayRecord {
    /// Game the playthrough belonged to
    pub game_id: GameId,
    /// Winning candidate's name
    pub winner_name: String,
    /// Winning candidate's media
    pub winner_media: MediaRef,
    /// When the playthrough finished
    pub played_at: DateTime<Utc>,
}

/// One leaderboard row, derived at query time
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RankingEntry {
    /// Candidate name
    pub name: String,
    /// Candidate media
    pub media: MediaRef,
    /// Number of playthroughs this candidate won
    pub count: u64,
}

/// Leaderboard query result
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RankingSummary {
    /// Total recorded playthroughs for the game
    pub total_plays: u64,
    /// Top entries, descending by count
    pub ranking: Vec<RankingEntry>,
}
