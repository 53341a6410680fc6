//! SQLite-backed key-value store.
//!
//! Persists engine state across sessions in a small SQLite database with WAL
//! mode enabled. Change notifications are process-local: a broadcast fires on
//! every successful write through this store.

use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use tokio::sync::broadcast;

use chrono::Utc;
use log::{error, info};
use sqlx::SqlitePool;

use super::store::{StateStore, StoreChange};
use crate::error_handling::StoreError;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Key-value store persisted in a SQLite database file.
pub struct SqliteStore {
    pool: SqlitePool,
    changes: broadcast::Sender<StoreChange>,
}

impl SqliteStore {
    /// Opens (creating if needed) the store at `db_path`, enables WAL mode,
    /// and ensures the state table exists.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let db_path_str = db_path.to_string_lossy().to_string();
        match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&db_path_str)
        {
            Ok(_) => info!("State database file created."),
            Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
                info!("State database file already exists.")
            }
            Err(e) => {
                error!("Failed to create state database file: {e}");
                return Err(StoreError::FileCreationError(e.to_string()));
            }
        }

        let pool = SqlitePool::connect(&format!("sqlite:{}", db_path_str)).await?;

        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&pool)
            .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS truthlens_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(SqliteStore { pool, changes })
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM truthlens_state WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO truthlens_state (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        let _ = self.changes.send(StoreChange {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}
