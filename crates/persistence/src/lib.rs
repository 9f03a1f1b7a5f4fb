#![deny(warnings)]

//! Persistence layer: a single-slot save store over SQLite.
//!
//! The full game state is stored as one JSON text in one row. Restore is
//! tolerant by design: a missing or corrupt snapshot reads as "no saved
//! game", and a legacy snapshot with absent fields is backfilled from a
//! freshly computed baseline via a two-level shallow merge
//! (`baseline ⊕ stored.indicators ⊕ stored top-level`). This is a defensive
//! merge, not a versioned migration.

use chrono::Utc;
use sim_core::{apply_effects, EffectDelta, GameState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// The fixed identifier of the single save slot.
pub const SAVE_SLOT: &str = "default";

/// Returns the default SQLite URL used for local saves.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./saves/statecraft.db"
}

/// Errors from the save store. Corrupt snapshot *content* is not an error;
/// it reads as `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Single-slot save store. One row, whole-state overwrite on save.
pub struct SaveStore {
    pool: SqlitePool,
}

impl SaveStore {
    /// Open (and create if missing) the store at the given SQLite URL.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // One connection: the slot has exactly one logical owner, and it
        // keeps in-memory test databases coherent.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS save_slot (
                slot TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// Overwrite the slot with the full game state.
    pub async fn save(&self, state: &GameState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        sqlx::query(
            "INSERT INTO save_slot (slot, state, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET state = excluded.state, saved_at = excluded.saved_at",
        )
        .bind(SAVE_SLOT)
        .bind(&json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Load the saved game, or `None` when the slot is empty or its content
    /// cannot be understood.
    pub async fn load(&self) -> Result<Option<GameState>, StoreError> {
        let row = sqlx::query("SELECT state FROM save_slot WHERE slot = ?1")
            .bind(SAVE_SLOT)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row.try_get("state")?;
        Ok(merge_snapshot(&raw))
    }

    /// Delete the slot (game reset).
    pub async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM save_slot WHERE slot = ?1")
            .bind(SAVE_SLOT)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Rebuild a game state from a raw snapshot, backfilling anything absent
/// from a freshly computed baseline. Returns `None` (with a warning) when
/// the snapshot is not salvageable at all.
pub fn merge_snapshot(raw: &str) -> Option<GameState> {
    let stored: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "saved snapshot is not valid JSON; treating as no saved game");
            return None;
        }
    };
    let Some(stored_obj) = stored.as_object() else {
        warn!("saved snapshot is not an object; treating as no saved game");
        return None;
    };

    let name = stored_obj
        .get("presidentName")
        .and_then(serde_json::Value::as_str)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("President");
    let baseline = GameState::new(name);
    let mut merged = match serde_json::to_value(&baseline) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "baseline state failed to serialize");
            return None;
        }
    };

    if let Some(stored_ind) = stored_obj
        .get("indicators")
        .and_then(serde_json::Value::as_object)
    {
        if let Some(target) = merged
            .get_mut("indicators")
            .and_then(serde_json::Value::as_object_mut)
        {
            for (k, v) in stored_ind {
                target.insert(k.clone(), v.clone());
            }
        }
    }
    if let Some(target) = merged.as_object_mut() {
        for (k, v) in stored_obj {
            if k != "indicators" {
                target.insert(k.clone(), v.clone());
            }
        }
    }

    let mut state: GameState = match serde_json::from_value(merged) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "saved snapshot does not merge into a game state");
            return None;
        }
    };
    // Legacy snapshots may carry a stale composite; recompute it.
    state.indicators = apply_effects(&state.indicators, &EffectDelta::default());
    Some(state)
}
