//! SQLite persistence
//!
//! One [`Database`] handle is created at startup and cloned into every
//! component that needs it. The underlying connection is synchronous; it
//! lives behind a `tokio` mutex and every operation is a single short
//! statement, so holding the lock across an `.await` point never happens.

mod access;
mod channels;
mod usage;

pub use access::AccessKind;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable handle to the bot's SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<sqlite::Connection>>,
    /// Config-supplied fallback when no admin-set default limit exists.
    default_daily_limit: i64,
    /// Offset used to stamp grant dates consistently with the reset boundary.
    utc_offset: FixedOffset,
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// `":memory:"` is accepted for tests.
    pub async fn new(
        path: &str,
        default_daily_limit: i64,
        utc_offset: FixedOffset,
    ) -> Result<Self> {
        let conn = sqlite::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;
        let database = Database {
            conn: Arc::new(Mutex::new(conn)),
            default_daily_limit,
            utc_offset,
        };
        database.init_schema().await?;
        info!("Database ready at {path}");
        Ok(database)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS access (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     INTEGER NOT NULL,
                access_type TEXT NOT NULL,
                granted_at  TEXT NOT NULL,
                disabled_at TEXT DEFAULT NULL
            );
            CREATE TABLE IF NOT EXISTS allowed_channels (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_id INTEGER NOT NULL UNIQUE,
                guild_id   INTEGER NOT NULL,
                added_at   TEXT NOT NULL,
                added_by   INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS usage_limits (
                user_id     INTEGER PRIMARY KEY,
                daily_limit INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS usage_counts (
                user_id INTEGER PRIMARY KEY,
                count   INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS settings (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .context("failed to initialize database schema")?;
        Ok(())
    }

    /// Today's date in the configured offset, as stored in grant columns.
    pub(crate) fn today(&self) -> String {
        chrono::Utc::now()
            .with_timezone(&self.utc_offset)
            .format("%Y-%m-%d")
            .to_string()
    }

    /// Current timestamp in the configured offset (RFC 3339).
    pub(crate) fn now(&self) -> String {
        chrono::Utc::now().with_timezone(&self.utc_offset).to_rfc3339()
    }

    pub(crate) fn default_daily_limit(&self) -> i64 {
        self.default_daily_limit
    }

    pub(crate) fn conn(&self) -> &Arc<Mutex<sqlite::Connection>> {
        &self.conn
    }
}

#[cfg(test)]
pub(crate) async fn test_database() -> Database {
    Database::new(":memory:", 10, FixedOffset::east_opt(0).unwrap())
        .await
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_init_is_idempotent() {
        let database = test_database().await;
        // A second pass over CREATE TABLE IF NOT EXISTS must not fail
        database.init_schema().await.unwrap();
    }
}
