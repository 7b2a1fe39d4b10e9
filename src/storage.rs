//! SQLite storage layer for Dermtrack.
//!
//! The store is a scoped key-value table: every value lives under a
//! `(scope, key)` pair, and the analysis history is a single JSON array under
//! [`ANALYSES_KEY`]. Each save rewrites that array in full.

use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::AnalysisRecord;

/// Key under which the analysis history is stored.
pub const ANALYSES_KEY: &str = "skinAnalyses";

/// Default number of pooled connections for file-backed databases.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Database connection pool wrapper bound to one storage scope.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
    scope: String,
}

impl Storage {
    /// Create a new storage instance with default pool settings.
    ///
    /// # Arguments
    ///
    /// * `database_url` - SQLite connection string (e.g., "sqlite:dermtrack.db?mode=rwc" or "sqlite::memory:")
    /// * `scope` - Namespace isolating this store's keys from other users of the database
    pub async fn new(database_url: &str, scope: &str) -> anyhow::Result<Self> {
        Self::connect(database_url, scope, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Create a new storage instance and initialize the schema.
    ///
    /// In-memory databases are private to a connection, so they always get a
    /// single connection that is never recycled.
    pub async fn connect(
        database_url: &str,
        scope: &str,
        max_connections: u32,
    ) -> anyhow::Result<Self> {
        let options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = options.connect(database_url).await?;

        let storage = Self {
            pool,
            scope: scope.to_string(),
        };
        storage.initialize_schema().await?;

        Ok(storage)
    }

    /// Create the key-value table if it doesn't exist.
    async fn initialize_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS key_value_store (
                scope TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (scope, key)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Read the raw value stored under `key`, or `None` if it was never written.
    pub async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            r#"
            SELECT value FROM key_value_store
            WHERE scope = ? AND key = ?
            "#,
        )
        .bind(&self.scope)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Overwrite the value stored under `key`.
    pub async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO key_value_store (scope, key, value, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(scope, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.scope)
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load the persisted analysis history.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(records))` - the stored list, possibly empty
    /// * `Ok(None)` - nothing was ever stored, or the stored value does not parse
    /// * `Err(_)` - the database itself could not be read
    pub async fn load_analyses(&self) -> StorageResult<Option<Vec<AnalysisRecord>>> {
        let Some(raw) = self.get_item(ANALYSES_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<AnalysisRecord>>(&raw) {
            Ok(records) => {
                debug!(scope = %self.scope, count = records.len(), "Analysis history loaded");
                Ok(Some(records))
            }
            Err(e) => {
                warn!(
                    scope = %self.scope,
                    error = %e,
                    "Stored analysis history is unreadable, treating as empty"
                );
                Ok(None)
            }
        }
    }

    /// Replace the persisted analysis history with `records`.
    pub async fn save_analyses(&self, records: &[AnalysisRecord]) -> StorageResult<()> {
        let raw = serde_json::to_string(records)?;
        self.set_item(ANALYSES_KEY, &raw).await?;

        debug!(scope = %self.scope, count = records.len(), "Analysis history saved");
        Ok(())
    }

    /// Close the underlying pool. Later operations fail with a database error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
