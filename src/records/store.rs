//! Play record storage backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::errors::RecordResult;
use super::models::PlayRecord;
use crate::bracket::models::{GameId, MediaKind, MediaRef};

/// Append-only play record storage
#[async_trait]
pub trait PlayRecordStore: Send + Sync {
    /// Append one record
    async fn append(&self, record: PlayRecord) -> RecordResult<()>;

    /// All records for a game, in insertion order
    async fn for_game(&self, game_id: GameId) -> RecordResult<Vec<PlayRecord>>;
}

/// In-memory record store for tests and headless use
#[derive(Debug, Default)]
pub struct MemoryPlayRecordStore {
    records: Mutex<Vec<PlayRecord>>,
}

impl MemoryPlayRecordStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records across all games
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl PlayRecordStore for MemoryPlayRecordStore {
    async fn append(&self, record: PlayRecord) -> RecordResult<()> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn for_game(&self, game_id: GameId) -> RecordResult<Vec<PlayRecord>> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| record.game_id == game_id)
            .cloned()
            .collect())
    }
}

/// Postgres-backed record store
#[derive(Clone)]
pub struct PgPlayRecordStore {
    pool: Arc<PgPool>,
}

impl PgPlayRecordStore {
    /// Create a store over a connection pool
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayRecordStore for PgPlayRecordStore {
    async fn append(&self, record: PlayRecord) -> RecordResult<()> {
        sqlx::query(
            r#"
            INSERT INTO play_records (game_id, winner_name, winner_url, winner_kind, played_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.game_id)
        .bind(&record.winner_name)
        .bind(&record.winner_media.url)
        .bind(match record.winner_media.kind {
            MediaKind::Image => "image",
            MediaKind::AnimatedClip => "animated-clip",
            MediaKind::EmbeddedVideo => "embedded-video",
        })
        .bind(record.played_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn for_game(&self, game_id: GameId) -> RecordResult<Vec<PlayRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT winner_name, winner_url, winner_kind, played_at
            FROM play_records
            WHERE game_id = $1
            ORDER BY played_at, id
            "#,
        )
        .bind(game_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let records = rows
            .into_iter()
            .map(|row| {
                let kind = match row.get::<String, _>("winner_kind").as_str() {
                    "animated-clip" => MediaKind::AnimatedClip,
                    "embedded-video" => MediaKind::EmbeddedVideo,
                    _ => MediaKind::Image,
                };
                PlayRecord {
                    game_id,
                    winner_name: row.get("winner_name"),
                    winner_media: MediaRef {
                        url: row.get("winner_url"),
                        kind,
                    },
                    played_at: row.get::<DateTime<Utc>, _>("played_at"),
                }
            })
            .collect();

        Ok(records)
    }
}
