//! `mockbin-store` — SQLite persistence for users, apis, bins, and request
//! logs.
//!
//! The store is the only shared resource in the system: handlers coordinate
//! exclusively through its atomicity guarantees. All queries go through a
//! cloneable [`Store`] handle over a `SqlitePool`.

pub mod error;

mod apis;
mod bins;
mod logs;
mod users;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub use error::StoreError;

/// SQLite-backed store. Cheap to clone; all clones share one pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Connect to the given database URL and bootstrap the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(url).await?;
        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    /// In-memory store for tests.
    ///
    /// Pinned to a single pooled connection that never expires: each SQLite
    /// `:memory:` connection is its own database, so the pool must not open
    /// a second one or drop the first.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn bootstrap(&self) -> Result<(), StoreError> {
        const SCHEMA: &[&str] = &[
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id    TEXT PRIMARY KEY,
                token TEXT NOT NULL UNIQUE
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS apis (
                id      TEXT PRIMARY KEY,
                api_id  TEXT NOT NULL UNIQUE,
                user_id TEXT NOT NULL REFERENCES users (id),
                data    TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS bins (
                id      TEXT PRIMARY KEY,
                bin_id  TEXT NOT NULL UNIQUE,
                user_id TEXT NOT NULL REFERENCES users (id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS request_logs (
                id         TEXT PRIMARY KEY,
                bin_id     TEXT NOT NULL,
                method     TEXT NOT NULL,
                headers    TEXT NOT NULL,
                query      TEXT NOT NULL,
                body       TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        ];

        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }
}
