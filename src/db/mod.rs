pub mod history;
pub mod preferences;
pub mod seed;
pub mod sqlite;
pub mod users;

pub use sqlite::create_pool;

use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};

/// Handle over the relational store holding users, preferences and watch history
///
/// Opened once at startup and passed to handlers through the application
/// state. Cloning is cheap and shares the underlying pool.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the database at `database_url` and brings its schema up to date
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self { pool })
    }

    /// Private, empty database for tests and throwaway runs
    pub async fn in_memory() -> anyhow::Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trips a trivial statement to prove the database is reachable
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Fails with `NotFound` unless the user exists
    pub async fn require_user(&self, user_id: &str) -> AppResult<()> {
        if self.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("User not found".to_string()))
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}
