//! Leaderboard aggregation over accumulated play records.

use std::collections::HashMap;
use std::sync::Arc;

use super::errors::RecordResult;
use super::models::{DEFAULT_RANKING_LIMIT, RankingEntry, RankingSummary};
use super::store::PlayRecordStore;
use crate::bracket::models::GameId;

/// Aggregates a game's play records into a leaderboard
#[derive(Clone)]
pub struct RankingAggregator {
    store: Arc<dyn PlayRecordStore>,
}

impl RankingAggregator {
    /// Create an aggregator over a record store
    pub fn new(store: Arc<dyn PlayRecordStore>) -> Self {
        Self { store }
    }

    /// Leaderboard with the default entry limit
    ///
    /// # Errors
    ///
    /// * `RecordError::Database` / `RecordError::Storage` - records could not be read
    pub async fn query(&self, game_id: GameId) -> RecordResult<RankingSummary> {
        self.query_limited(game_id, DEFAULT_RANKING_LIMIT).await
    }

    /// Leaderboard limited to the top `limit` entries.
    ///
    /// Records are grouped by winner identity (name + media URL) and counted.
    /// Entries sort descending by count; equal counts keep first-occurrence
    /// order in record history, so the result is deterministic regardless of
    /// grouping order.
    ///
    /// # Errors
    ///
    /// * `RecordError::Database` / `RecordError::Storage` - records could not be read
    pub async fn query_limited(
        &self,
        game_id: GameId,
        limit: usize,
    ) -> RecordResult<RankingSummary> {
        let records = self.store.for_game(game_id).await?;
        let total_plays = records.len() as u64;

        // Insertion-ordered grouping keeps the first-occurrence tie-break.
        let mut positions: HashMap<(String, String), usize> = HashMap::new();
        let mut entries: Vec<RankingEntry> = Vec::new();
        for record in records {
            let key = (record.winner_name.clone(), record.winner_media.url.clone());
            match positions.get(&key) {
                Some(&index) => entries[index].count += 1,
                None => {
                    positions.insert(key, entries.len());
                    entries.push(RankingEntry {
                        name: record.winner_name,
                        media: record.winner_media,
                        count: 1,
                    });
                }
            }
        }

        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(limit);

        Ok(RankingSummary {
            total_plays,
            ranking: entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::models::{Candidate, MediaKind};
    use crate::records::recorder::WinnerRecorder;
    use crate::records::store::MemoryPlayRecordStore;

    fn candidate(name: &str) -> Candidate {
        Candidate::new(
            name,
            format!("https://cdn.example.com/{name}.png"),
            MediaKind::Image,
        )
    }

    async fn record_wins(recorder: &WinnerRecorder, game_id: GameId, wins: &[(&str, usize)]) {
        for (name, count) in wins {
            for _ in 0..*count {
                recorder
                    .record_winner(game_id, &candidate(name))
                    .await
                    .expect("record");
            }
        }
    }

    #[tokio::test]
    async fn test_counts_and_orders_by_wins() {
        let store = Arc::new(MemoryPlayRecordStore::new());
        let recorder = WinnerRecorder::new(store.clone());
        record_wins(&recorder, 1, &[("b", 2), ("a", 3)]).await;

        let summary = RankingAggregator::new(store).query(1).await.expect("query");
        assert_eq!(summary.total_plays, 5);
        assert_eq!(summary.ranking.len(), 2);
        assert_eq!(summary.ranking[0].name, "a");
        assert_eq!(summary.ranking[0].count, 3);
        assert_eq!(summary.ranking[1].name, "b");
        assert_eq!(summary.ranking[1].count, 2);
    }

    #[tokio::test]
    async fn test_ties_keep_first_occurrence_order() {
        let store = Arc::new(MemoryPlayRecordStore::new());
        let recorder = WinnerRecorder::new(store.clone());
        // c appears first in history, then a, then b; all tied at 1.
        record_wins(&recorder, 1, &[("c", 1), ("a", 1), ("b", 1)]).await;

        let summary = RankingAggregator::new(store).query(1).await.expect("query");
        let names: Vec<&str> = summary.ranking.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_limit_is_honored() {
        let store = Arc::new(MemoryPlayRecordStore::new());
        let recorder = WinnerRecorder::new(store.clone());
        record_wins(&recorder, 1, &[("a", 3), ("b", 2), ("c", 1)]).await;

        let summary = RankingAggregator::new(store)
            .query_limited(1, 2)
            .await
            .expect("query");
        assert_eq!(summary.total_plays, 6);
        assert_eq!(summary.ranking.len(), 2);
    }

    #[tokio::test]
    async fn test_games_are_isolated() {
        let store = Arc::new(MemoryPlayRecordStore::new());
        let recorder = WinnerRecorder::new(store.clone());
        record_wins(&recorder, 1, &[("a", 2)]).await;
        record_wins(&recorder, 2, &[("b", 1)]).await;

        let aggregator = RankingAggregator::new(store);
        let summary = aggregator.query(2).await.expect("query");
        assert_eq!(summary.total_plays, 1);
        assert_eq!(summary.ranking[0].name, "b");
    }

    #[tokio::test]
    async fn test_empty_game_has_empty_ranking() {
        let store = Arc::new(MemoryPlayRecordStore::new());
        let summary = RankingAggregator::new(store).query(9).await.expect("query");
        assert_eq!(summary.total_plays, 0);
        assert!(summary.ranking.is_empty());
    }
}
