use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;

pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        Self::connect(
            &config.database_url,
            config.db_max_connections,
            config.busy_timeout(),
        )
        .await
    }

    /// Open a pool where every operation checks a connection out and
    /// returns it on completion. Both the checkout and SQLite's write lock
    /// wait at most `busy_timeout` before failing.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        busy_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(busy_timeout);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(busy_timeout);

        // An in-memory database lives only while a connection is open
        if is_in_memory(database_url) {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self { pool })
    }
}

/// Whether the URL names a SQLite in-memory database.
pub fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
