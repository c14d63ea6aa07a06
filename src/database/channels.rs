//! Per-guild channel allow-list
//!
//! A guild with zero rows is open: commands run anywhere. Once a channel is
//! added, commands are confined to the listed channels. Re-adding a channel
//! refreshes its guild/added_at/added_by columns (upsert); removal is a hard
//! delete.

use anyhow::{Context, Result};
use sqlite::State;

use super::Database;

impl Database {
    /// Add `channel_id` to the allow-list, refreshing the row if present.
    pub async fn add_allowed_channel(
        &self,
        channel_id: u64,
        guild_id: u64,
        added_by: u64,
    ) -> Result<()> {
        let now = self.now();
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare(
                "INSERT INTO allowed_channels (channel_id, guild_id, added_at, added_by)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT(channel_id) DO UPDATE SET
                     guild_id = excluded.guild_id,
                     added_at = excluded.added_at,
                     added_by = excluded.added_by",
            )
            .context("failed to prepare channel upsert")?;
        statement.bind((1, channel_id as i64))?;
        statement.bind((2, guild_id as i64))?;
        statement.bind((3, now.as_str()))?;
        statement.bind((4, added_by as i64))?;
        statement.next()?;
        Ok(())
    }

    /// Remove `channel_id` from the allow-list.
    ///
    /// Returns whether the channel was listed.
    pub async fn remove_allowed_channel(&self, channel_id: u64) -> Result<bool> {
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare("DELETE FROM allowed_channels WHERE channel_id = ?")
            .context("failed to prepare channel delete")?;
        statement.bind((1, channel_id as i64))?;
        statement.next()?;
        Ok(conn.change_count() > 0)
    }

    /// All allowed channel ids for `guild_id`. Empty means "open".
    pub async fn allowed_channels(&self, guild_id: u64) -> Result<Vec<u64>> {
        let conn = self.conn().lock().await;
        let mut statement = conn
            .prepare("SELECT channel_id FROM allowed_channels WHERE guild_id = ?")
            .context("failed to prepare channel list")?;
        statement.bind((1, guild_id as i64))?;
        let mut channels = Vec::new();
        while statement.next()? == State::Row {
            channels.push(statement.read::<i64, _>(0)? as u64);
        }
        Ok(channels)
    }
}

#[cfg(test)]
mod tests {
    use crate::database::test_database;

    const GUILD: u64 = 77;

    #[tokio::test]
    async fn test_empty_guild_lists_nothing() {
        let database = test_database().await;
        assert!(database.allowed_channels(GUILD).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let database = test_database().await;
        database.add_allowed_channel(10, GUILD, 1).await.unwrap();
        database.add_allowed_channel(11, GUILD, 1).await.unwrap();
        let mut channels = database.allowed_channels(GUILD).await.unwrap();
        channels.sort_unstable();
        assert_eq!(channels, vec![10, 11]);
    }

    #[tokio::test]
    async fn test_re_add_is_upsert_not_duplicate() {
        let database = test_database().await;
        database.add_allowed_channel(10, GUILD, 1).await.unwrap();
        database.add_allowed_channel(10, GUILD, 2).await.unwrap();
        assert_eq!(database.allowed_channels(GUILD).await.unwrap(), vec![10]);
    }

    #[tokio::test]
    async fn test_re_add_can_move_guilds() {
        let database = test_database().await;
        database.add_allowed_channel(10, GUILD, 1).await.unwrap();
        database.add_allowed_channel(10, GUILD + 1, 1).await.unwrap();
        assert!(database.allowed_channels(GUILD).await.unwrap().is_empty());
        assert_eq!(
            database.allowed_channels(GUILD + 1).await.unwrap(),
            vec![10]
        );
    }

    #[tokio::test]
    async fn test_remove_reports_presence() {
        let database = test_database().await;
        database.add_allowed_channel(10, GUILD, 1).await.unwrap();
        assert!(database.remove_allowed_channel(10).await.unwrap());
        assert!(!database.remove_allowed_channel(10).await.unwrap());
        assert!(database.allowed_channels(GUILD).await.unwrap().is_empty());
    }
}
