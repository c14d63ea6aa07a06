//! Access grant records
//!
//! Grants are append-only: disabling sets `disabled_at` rather than deleting,
//! so a user's grant history survives. "Active" means `disabled_at IS NULL`.

use anyhow::{Context, Result};
use sqlite::State;

use super::Database;

/// The two grantable access types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Exempt from daily usage limits.
    Advanced,
    /// Denied all bot interaction.
    Blocked,
}

impl AccessKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessKind::Advanced => "advanced",
            AccessKind::Blocked => "blocked",
        }
    }

    /// Parse a command option value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "advanced" => Some(AccessKind::Advanced),
            "blocked" => Some(AccessKind::Blocked),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Database {
    /// Record a new access grant for `user_id`.
    pub async fn grant_access(&self, user_id: u64, kind: AccessKind) -> Result<()> {
        let date = self.today();
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare("INSERT INTO access (user_id, access_type, granted_at) VALUES (?, ?, ?)")
            .context("failed to prepare access insert")?;
        statement.bind((1, user_id as i64))?;
        statement.bind((2, kind.as_str()))?;
        statement.bind((3, date.as_str()))?;
        statement.next()?;
        Ok(())
    }

    /// Disable every active grant of `kind` for `user_id`.
    ///
    /// Returns whether any grant was actually active.
    pub async fn disable_access(&self, user_id: u64, kind: AccessKind) -> Result<bool> {
        let date = self.today();
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare(
                "UPDATE access SET disabled_at = ?
                 WHERE user_id = ? AND access_type = ? AND disabled_at IS NULL",
            )
            .context("failed to prepare access disable")?;
        statement.bind((1, date.as_str()))?;
        statement.bind((2, user_id as i64))?;
        statement.bind((3, kind.as_str()))?;
        statement.next()?;
        Ok(conn.change_count() > 0)
    }

    /// Whether `user_id` currently holds an active grant of `kind`.
    pub async fn has_active_access(&self, user_id: u64, kind: AccessKind) -> Result<bool> {
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare(
                "SELECT 1 FROM access
                 WHERE user_id = ? AND access_type = ? AND disabled_at IS NULL
                 LIMIT 1",
            )
            .context("failed to prepare access lookup")?;
        statement.bind((1, user_id as i64))?;
        statement.bind((2, kind.as_str()))?;
        Ok(statement.next()? == State::Row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_database;

    #[tokio::test]
    async fn test_fresh_user_has_no_access() {
        let database = test_database().await;
        assert!(!database
            .has_active_access(1, AccessKind::Advanced)
            .await
            .unwrap());
        assert!(!database
            .has_active_access(1, AccessKind::Blocked)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_grant_then_disable_round_trip() {
        let database = test_database().await;
        database.grant_access(1, AccessKind::Blocked).await.unwrap();
        assert!(database
            .has_active_access(1, AccessKind::Blocked)
            .await
            .unwrap());

        assert!(database
            .disable_access(1, AccessKind::Blocked)
            .await
            .unwrap());
        assert!(!database
            .has_active_access(1, AccessKind::Blocked)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_disable_without_grant_reports_nothing_active() {
        let database = test_database().await;
        assert!(!database
            .disable_access(1, AccessKind::Advanced)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_regrant_after_disable_is_active_again() {
        let database = test_database().await;
        database.grant_access(1, AccessKind::Advanced).await.unwrap();
        database.disable_access(1, AccessKind::Advanced).await.unwrap();
        database.grant_access(1, AccessKind::Advanced).await.unwrap();
        assert!(database
            .has_active_access(1, AccessKind::Advanced)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_kinds_are_independent() {
        let database = test_database().await;
        database.grant_access(1, AccessKind::Advanced).await.unwrap();
        database.grant_access(1, AccessKind::Blocked).await.unwrap();
        database.disable_access(1, AccessKind::Blocked).await.unwrap();
        assert!(database
            .has_active_access(1, AccessKind::Advanced)
            .await
            .unwrap());
        assert!(!database
            .has_active_access(1, AccessKind::Blocked)
            .await
            .unwrap());
    }
}
