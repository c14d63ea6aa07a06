//! Daily usage ledger
//!
//! Counters are created lazily on first increment and zeroed in one
//! statement by the reset scheduler. The effective limit for a user is:
//! per-user override row, else the admin-set default in `settings`, else
//! the config fallback. Increments are single-statement upserts; exact
//! serialization under concurrent increments is not required.

use anyhow::{Context, Result};
use sqlite::State;

use super::Database;

const DEFAULT_LIMIT_KEY: &str = "default_daily_limit";

impl Database {
    /// The number of calls `user_id` has made since the last reset.
    pub async fn user_daily_usage(&self, user_id: u64) -> Result<i64> {
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare("SELECT count FROM usage_counts WHERE user_id = ?")
            .context("failed to prepare usage lookup")?;
        statement.bind((1, user_id as i64))?;
        if statement.next()? == State::Row {
            Ok(statement.read::<i64, _>(0)?)
        } else {
            Ok(0)
        }
    }

    /// The daily limit in effect for `user_id`.
    pub async fn user_daily_limit(&self, user_id: u64) -> Result<i64> {
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare("SELECT daily_limit FROM usage_limits WHERE user_id = ?")
            .context("failed to prepare limit lookup")?;
        statement.bind((1, user_id as i64))?;
        if statement.next()? == State::Row {
            return Ok(statement.read::<i64, _>(0)?);
        }
        drop(statement);

        let mut statement = conn
            .prepare("SELECT value FROM settings WHERE key = ?")
            .context("failed to prepare settings lookup")?;
        statement.bind((1, DEFAULT_LIMIT_KEY))?;
        if statement.next()? == State::Row {
            let raw = statement.read::<String, _>(0)?;
            if let Ok(value) = raw.parse::<i64>() {
                return Ok(value);
            }
        }
        Ok(self.default_daily_limit())
    }

    /// Count one call for `user_id`, creating the counter row if absent.
    pub async fn increment_usage(&self, user_id: u64) -> Result<()> {
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare(
                "INSERT INTO usage_counts (user_id, count) VALUES (?, 1)
                 ON CONFLICT(user_id) DO UPDATE SET count = count + 1",
            )
            .context("failed to prepare usage increment")?;
        statement.bind((1, user_id as i64))?;
        statement.next()?;
        Ok(())
    }

    /// Set a per-user limit override.
    ///
    /// No command exposes this yet; admins get the process-wide default via
    /// [`Database::set_default_daily_limit`].
    pub async fn set_user_daily_limit(&self, user_id: u64, limit: i64) -> Result<()> {
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare(
                "INSERT INTO usage_limits (user_id, daily_limit) VALUES (?, ?)
                 ON CONFLICT(user_id) DO UPDATE SET daily_limit = excluded.daily_limit",
            )
            .context("failed to prepare limit override")?;
        statement.bind((1, user_id as i64))?;
        statement.bind((2, limit))?;
        statement.next()?;
        Ok(())
    }

    /// Set the process-wide default daily limit (admin command).
    pub async fn set_default_daily_limit(&self, limit: i64) -> Result<()> {
        let value = limit.to_string();
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare(
                "INSERT INTO settings (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .context("failed to prepare default limit update")?;
        statement.bind((1, DEFAULT_LIMIT_KEY))?;
        statement.bind((2, value.as_str()))?;
        statement.next()?;
        Ok(())
    }

    /// Zero every user's counter. Called by the daily reset scheduler.
    pub async fn reset_all_usage(&self) -> Result<()> {
        let conn = self.conn().lock().await;
        conn.execute("UPDATE usage_counts SET count = 0")
            .context("failed to reset usage counts")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::database::test_database;

    #[tokio::test]
    async fn test_fresh_user_usage_is_zero() {
        let database = test_database().await;
        assert_eq!(database.user_daily_usage(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_increment_n_times_counts_n() {
        let database = test_database().await;
        for _ in 0..5 {
            database.increment_usage(1).await.unwrap();
        }
        assert_eq!(database.user_daily_usage(1).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_reset_zeroes_every_user() {
        let database = test_database().await;
        database.increment_usage(1).await.unwrap();
        database.increment_usage(2).await.unwrap();
        database.increment_usage(2).await.unwrap();

        database.reset_all_usage().await.unwrap();
        assert_eq!(database.user_daily_usage(1).await.unwrap(), 0);
        assert_eq!(database.user_daily_usage(2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_limit_falls_back_to_config_default() {
        let database = test_database().await;
        // test_database passes 10 as the config fallback
        assert_eq!(database.user_daily_limit(1).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_admin_default_beats_config_fallback() {
        let database = test_database().await;
        database.set_default_daily_limit(25).await.unwrap();
        assert_eq!(database.user_daily_limit(1).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_user_override_beats_default() {
        let database = test_database().await;
        database.set_default_daily_limit(25).await.unwrap();
        database.set_user_daily_limit(1, 3).await.unwrap();
        assert_eq!(database.user_daily_limit(1).await.unwrap(), 3);
        assert_eq!(database.user_daily_limit(2).await.unwrap(), 25);
    }
}
