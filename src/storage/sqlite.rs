// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! SQLite-backed state store

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

use super::{StateStore, StorageSlot};
use crate::errors::StorageError;

/// One row per slot in `state_slots`
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Connect and run migrations
    ///
    /// File databases are created on first use, including their parent
    /// directory. `sqlite::memory:` keeps everything in process.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let in_memory = database_url.contains(":memory:");

        if !in_memory {
            if let Some(parent) = database_file_path(database_url).and_then(|p| p.parent()) {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") && !database_url.contains('?') {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        // A single connection keeps an in-memory database alive and shared
        let max_connections = if in_memory { 1 } else { 4 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        debug!(database_url = %database_url, "State store ready");
        Ok(store)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS state_slots (
                slot TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Write raw text into a slot without JSON encoding
    pub async fn save_raw(&self, slot: StorageSlot, raw: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO state_slots (slot, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(slot) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(slot.key())
        .bind(raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Filesystem path of a `sqlite:` URL, if it names a file
fn database_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.trim_start_matches("//");
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() {
        None
    } else {
        Some(Path::new(path))
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn save(&self, slot: StorageSlot, value: &Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(value).map_err(|source| StorageError::Encode { slot, source })?;
        self.save_raw(slot, &text).await
    }

    async fn load(&self, slot: StorageSlot) -> Result<Option<Value>, StorageError> {
        let row = sqlx::query("SELECT value FROM state_slots WHERE slot = ?1")
            .bind(slot.key())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let text: String = row.try_get("value")?;
                serde_json::from_str(&text)
                    .map(Some)
                    .map_err(|source| StorageError::Decode { slot, source })
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, slot: StorageSlot) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM state_slots WHERE slot = ?1")
            .bind(slot.key())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_file_path() {
        assert_eq!(
            database_file_path("sqlite:./data/diet-tracker.db"),
            Some(Path::new("./data/diet-tracker.db"))
        );
        assert_eq!(
            database_file_path("sqlite:///tmp/state.db?mode=rwc"),
            Some(Path::new("/tmp/state.db"))
        );
        assert_eq!(database_file_path("postgres://localhost/db"), None);
    }

    #[tokio::test]
    async fn test_memory_database_round_trip() {
        let store = SqliteStore::new("sqlite::memory:").await.unwrap();
        let value = serde_json::json!({"calories": 2000});

        store.save(StorageSlot::Nutrition, &value).await.unwrap();
        assert_eq!(store.load(StorageSlot::Nutrition).await.unwrap(), Some(value));

        store.remove(StorageSlot::Nutrition).await.unwrap();
        assert!(store.load(StorageSlot::Nutrition).await.unwrap().is_none());
    }
}
