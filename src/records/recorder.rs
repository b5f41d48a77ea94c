//! Winner recording.

use chrono::Utc;
use std::sync::Arc;
use url::Url;

use super::errors::{RecordError, RecordResult};
use super::models::PlayRecord;
use super::store::PlayRecordStore;
use crate::bracket::models::{Candidate, GameId};

/// Emits a completed playthrough's winner to durable storage.
///
/// Delivery is at-least-once with no deduplication: each call appends a
/// fresh [`PlayRecord`], so a caller-level retry of the same playthrough
/// produces multiple records and the aggregator will count them all. The
/// session invokes this exactly once per finished bracket; anything beyond
/// that is the caller's retry policy.
#[derive(Clone)]
pub struct WinnerRecorder {
    store: Arc<dyn PlayRecordStore>,
}

impl WinnerRecorder {
    /// Create a recorder over a record store
    pub fn new(store: Arc<dyn PlayRecordStore>) -> Self {
        Self { store }
    }

    /// Append a play record for the winning candidate.
    ///
    /// # Errors
    ///
    /// * `RecordError::EmptyWinnerName` - winner name is empty or whitespace
    /// * `RecordError::InvalidMediaUrl` - winner media URL does not parse
    /// * `RecordError::Database` / `RecordError::Storage` - append failed
    pub async fn record_winner(&self, game_id: GameId, winner: &Candidate) -> RecordResult<()> {
        if winner.name.trim().is_empty() {
            return Err(RecordError::EmptyWinnerName);
        }
        if Url::parse(&winner.media.url).is_err() {
            return Err(RecordError::InvalidMediaUrl(winner.media.url.clone()));
        }

        self.store
            .append(PlayRecord {
                game_id,
                winner_name: winner.name.clone(),
                winner_media: winner.media.clone(),
                played_at: Utc::now(),
            })
            .await
    }
}
