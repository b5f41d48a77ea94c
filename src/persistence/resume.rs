//! Durable cross-device resume registry.
//!
//! One snapshot per `(owner_id, game_id)`, upserted after every transition
//! while an owner is attached to the playthrough. Listing returns snapshots
//! in the canonical field shape regardless of which backend (or legacy field
//! naming) produced them; the serde aliases on [`Snapshot`] do the mapping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::errors::PersistenceResult;
use crate::bracket::errors::{BracketError, BracketResult};
use crate::bracket::models::{Candidate, GameId, OwnerId, Snapshot};

/// Durable per-user snapshot storage
#[async_trait]
pub trait ResumeRegistry: Send + Sync {
    /// Upsert the snapshot for `(owner_id, snapshot.game_id)`
    async fn save(&self, owner_id: OwnerId, snapshot: &Snapshot) -> PersistenceResult<()>;

    /// All in-progress brackets for the user, newest first
    async fn list(&self, owner_id: OwnerId) -> PersistenceResult<Vec<Snapshot>>;

    /// Remove one snapshot; no-op if absent
    async fn delete(&self, owner_id: OwnerId, game_id: GameId) -> PersistenceResult<()>;
}

/// Re-validate a stored snapshot against the game's current content.
///
/// Content can shrink between sessions; a bracket that references removed
/// candidates cannot be resumed and the caller must fall back to round
/// selection.
///
/// # Errors
///
/// * `BracketError::ContentMismatch` - a stored candidate no longer exists
pub fn check_content(snapshot: &Snapshot, content: &[Candidate]) -> BracketResult<()> {
    let stored = snapshot
        .state
        .round_candidates
        .iter()
        .chain(snapshot.state.advancing.iter());
    for candidate in stored {
        if !content.contains(candidate) {
            return Err(BracketError::ContentMismatch);
        }
    }
    Ok(())
}

/// In-memory resume registry for tests and headless use.
///
/// Payloads are stored as JSON text and decoded on read, the same round-trip
/// the durable backends go through.
#[derive(Debug, Default)]
pub struct MemoryResumeRegistry {
    snapshots: Mutex<HashMap<(OwnerId, GameId), String>>,
}

impl MemoryResumeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw payload, bypassing serialization (test helper for
    /// exercising legacy and corrupt payload handling)
    pub async fn insert_raw(&self, owner_id: OwnerId, game_id: GameId, payload: &str) {
        self.snapshots
            .lock()
            .await
            .insert((owner_id, game_id), payload.to_string());
    }
}

#[async_trait]
impl ResumeRegistry for MemoryResumeRegistry {
    async fn save(&self, owner_id: OwnerId, snapshot: &Snapshot) -> PersistenceResult<()> {
        let payload = serde_json::to_string(snapshot)?;
        self.snapshots
            .lock()
            .await
            .insert((owner_id, snapshot.game_id), payload);
        Ok(())
    }

    async fn list(&self, owner_id: OwnerId) -> PersistenceResult<Vec<Snapshot>> {
        let snapshots = self.snapshots.lock().await;
        let mut found: Vec<Snapshot> = Vec::new();
        for ((owner, game_id), payload) in snapshots.iter() {
            if *owner != owner_id {
                continue;
            }
            match serde_json::from_str::<Snapshot>(payload) {
                Ok(snapshot) if snapshot.validate().is_ok() => found.push(snapshot),
                Ok(_) | Err(_) => {
                    warn!("skipping unreadable snapshot for owner {owner_id}, game {game_id}");
                }
            }
        }
        found.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(found)
    }

    async fn delete(&self, owner_id: OwnerId, game_id: GameId) -> PersistenceResult<()> {
        self.snapshots.lock().await.remove(&(owner_id, game_id));
        Ok(())
    }
}

/// Postgres-backed resume registry
#[derive(Clone)]
pub struct PgResumeRegistry {
    pool: Arc<PgPool>,
}

impl PgResumeRegistry {
    /// Create a registry over a connection pool
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeRegistry for PgResumeRegistry {
    async fn save(&self, owner_id: OwnerId, snapshot: &Snapshot) -> PersistenceResult<()> {
        let payload = serde_json::to_string(&snapshot.state)?;

        sqlx::query(
            r#"
            INSERT INTO bracket_snapshots (owner_id, game_id, title, description, state, saved_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (owner_id, game_id)
            DO UPDATE SET title = $3, description = $4, state = $5, saved_at = $6
            "#,
        )
        .bind(owner_id)
        .bind(snapshot.game_id)
        .bind(&snapshot.title)
        .bind(&snapshot.description)
        .bind(&payload)
        .bind(snapshot.saved_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn list(&self, owner_id: OwnerId) -> PersistenceResult<Vec<Snapshot>> {
        let rows = sqlx::query(
            r#"
            SELECT game_id, title, description, state, saved_at
            FROM bracket_snapshots
            WHERE owner_id = $1
            ORDER BY saved_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut found = Vec::with_capacity(rows.len());
        for row in rows {
            let game_id: GameId = row.get("game_id");
            let payload: String = row.get("state");
            let state = match serde_json::from_str(&payload) {
                Ok(state) => state,
                Err(err) => {
                    warn!("skipping unreadable snapshot for owner {owner_id}, game {game_id}: {err}");
                    continue;
                }
            };

            let snapshot = Snapshot {
                game_id,
                owner_id: Some(owner_id),
                title: row.get("title"),
                description: row.get("description"),
                saved_at: row.get::<DateTime<Utc>, _>("saved_at"),
                state,
            };
            if snapshot.validate().is_err() {
                warn!("skipping invalid snapshot for owner {owner_id}, game {game_id}");
                continue;
            }
            found.push(snapshot);
        }

        Ok(found)
    }

    async fn delete(&self, owner_id: OwnerId, game_id: GameId) -> PersistenceResult<()> {
        sqlx::query("DELETE FROM bracket_snapshots WHERE owner_id = $1 AND game_id = $2")
            .bind(owner_id)
            .bind(game_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
