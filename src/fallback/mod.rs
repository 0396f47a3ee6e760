//! # Local Fallback Store
//!
//! Persists the whole item list as one serialized blob when no remote
//! backend is configured. There is no subscription and no ordering logic
//! here; callers load the list, mutate it, and save it back.
//!
//! ## Storage
//!
//! [`SqliteFallback`] keeps a single row in a `kv(key, value)` table under
//! the fixed key [`ITEMS_KEY`], JSON-encoded. A missing row loads as an
//! empty list.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hearthlist::fallback::{FallbackStore, SqliteFallback};
//!
//! # async fn example() -> Result<(), hearthlist::fallback::FallbackError> {
//! let store = SqliteFallback::open("fallback.sqlite").await?;
//! let mut items = store.load().await?;
//! items.retain(|item| !item.completed);
//! store.save(&items).await?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::shared::item::Item;

/// Key under which the item list is stored
pub const ITEMS_KEY: &str = "hearthlist.items";

#[derive(Error, Debug)]
pub enum FallbackError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored item list is not valid JSON: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FallbackError>;

/// Load/save contract for the local-only item list
#[async_trait]
pub trait FallbackStore: Send + Sync {
    /// Stored items, or an empty list if nothing was saved yet
    async fn load(&self) -> Result<Vec<Item>>;

    /// Replace the stored list
    async fn save(&self, items: &[Item]) -> Result<()>;
}

/// SQLite-backed key/value blob store
#[derive(Debug, Clone)]
pub struct SqliteFallback {
    pool: SqlitePool,
}

impl SqliteFallback {
    /// Open or create the database file at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        tracing::debug!("[Fallback] Opened {}", path.display());
        Self::with_pool(pool).await
    }

    /// In-memory database, gone when the store is dropped
    pub async fn in_memory() -> Result<Self> {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl FallbackStore for SqliteFallback {
    async fn load(&self) -> Result<Vec<Item>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
            .bind(ITEMS_KEY)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((value,)) => {
                let items: Vec<Item> = serde_json::from_str(&value)?;
                tracing::debug!("[Fallback] Loaded {} items", items.len());
                Ok(items)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, items: &[Item]) -> Result<()> {
        let value = serde_json::to_string(items)?;
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(ITEMS_KEY)
        .bind(&value)
        .execute(&self.pool)
        .await?;

        tracing::debug!("[Fallback] Saved {} items", items.len());
        Ok(())
    }
}
