//! # Feature: Policy Gate
//!
//! Pre-execution authorization for slash commands. Each command declares an
//! ordered guard list; the gate evaluates it left to right and stops at the
//! first failure. The dispatcher turns any failure into one generic
//! permission-denied reply — which guard failed is logged, never shown.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::Result;
use std::sync::Arc;

use crate::database::{AccessKind, Database};

/// The closed set of authorization predicates commands can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Invoker is in the static admin allow-list.
    AdminUser,
    /// Command originates from an authorized guild.
    AuthorizedGuild,
    /// Invoker holds an active `advanced` grant.
    AdvancedUser,
    /// Invoker holds no active `blocked` grant.
    NotBlockedUser,
    /// Channel is allowed for the guild (open when none are configured).
    AllowedChannel,
    /// Invoker has daily calls left (admins and advanced users always do).
    DailyUsageLeft,
}

impl Guard {
    /// Name used in denial log lines.
    pub fn name(self) -> &'static str {
        match self {
            Guard::AdminUser => "admin_user",
            Guard::AuthorizedGuild => "authorized_guild",
            Guard::AdvancedUser => "advanced_user",
            Guard::NotBlockedUser => "not_blocked_user",
            Guard::AllowedChannel => "allowed_channel",
            Guard::DailyUsageLeft => "daily_usage_left",
        }
    }
}

/// Who and where a command invocation came from.
#[derive(Debug, Clone, Copy)]
pub struct GateContext {
    pub user_id: u64,
    pub guild_id: Option<u64>,
    pub channel_id: Option<u64>,
}

/// Evaluates guards against config allow-lists and persisted state.
#[derive(Clone)]
pub struct Gate {
    database: Database,
    admin_user_ids: Arc<Vec<u64>>,
    authorized_guild_ids: Arc<Vec<u64>>,
}

impl Gate {
    pub fn new(
        database: Database,
        admin_user_ids: Vec<u64>,
        authorized_guild_ids: Vec<u64>,
    ) -> Self {
        Gate {
            database,
            admin_user_ids: Arc::new(admin_user_ids),
            authorized_guild_ids: Arc::new(authorized_guild_ids),
        }
    }

    pub fn is_admin_user(&self, user_id: u64) -> bool {
        self.admin_user_ids.contains(&user_id)
    }

    pub fn is_authorized_guild(&self, guild_id: Option<u64>) -> bool {
        guild_id.is_some_and(|id| self.authorized_guild_ids.contains(&id))
    }

    pub async fn is_advanced_user(&self, user_id: u64) -> Result<bool> {
        self.database
            .has_active_access(user_id, AccessKind::Advanced)
            .await
    }

    pub async fn is_not_blocked_user(&self, user_id: u64) -> Result<bool> {
        Ok(!self
            .database
            .has_active_access(user_id, AccessKind::Blocked)
            .await?)
    }

    /// Admins pass anywhere. A guild with no configured channels is open;
    /// otherwise the invoking channel must be listed.
    pub async fn is_allowed_channel(&self, context: &GateContext) -> Result<bool> {
        if self.is_admin_user(context.user_id) {
            return Ok(true);
        }
        let (Some(guild_id), Some(channel_id)) = (context.guild_id, context.channel_id) else {
            return Ok(false);
        };
        let allowed = self.database.allowed_channels(guild_id).await?;
        Ok(allowed.is_empty() || allowed.contains(&channel_id))
    }

    pub async fn has_daily_usage_left(&self, user_id: u64) -> Result<bool> {
        if self.is_admin_user(user_id) || self.is_advanced_user(user_id).await? {
            return Ok(true);
        }
        let usage = self.database.user_daily_usage(user_id).await?;
        let limit = self.database.user_daily_limit(user_id).await?;
        Ok(usage < limit)
    }

    /// Evaluate one guard against the invocation context.
    pub async fn check(&self, guard: Guard, context: &GateContext) -> Result<bool> {
        match guard {
            Guard::AdminUser => Ok(self.is_admin_user(context.user_id)),
            Guard::AuthorizedGuild => Ok(self.is_authorized_guild(context.guild_id)),
            Guard::AdvancedUser => self.is_advanced_user(context.user_id).await,
            Guard::NotBlockedUser => self.is_not_blocked_user(context.user_id).await,
            Guard::AllowedChannel => self.is_allowed_channel(context).await,
            Guard::DailyUsageLeft => self.has_daily_usage_left(context.user_id).await,
        }
    }

    /// Evaluate `guards` in order; return the first one that fails.
    pub async fn first_failing(
        &self,
        guards: &[Guard],
        context: &GateContext,
    ) -> Result<Option<Guard>> {
        for &guard in guards {
            if !self.check(guard, context).await? {
                return Ok(Some(guard));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_database;

    const ADMIN: u64 = 1;
    const USER: u64 = 2;
    const GUILD: u64 = 100;
    const CHANNEL: u64 = 200;

    async fn test_gate() -> Gate {
        Gate::new(test_database().await, vec![ADMIN], vec![GUILD])
    }

    fn context(user_id: u64) -> GateContext {
        GateContext {
            user_id,
            guild_id: Some(GUILD),
            channel_id: Some(CHANNEL),
        }
    }

    #[tokio::test]
    async fn test_fresh_user_is_neither_advanced_nor_blocked() {
        let gate = test_gate().await;
        assert!(!gate.is_advanced_user(USER).await.unwrap());
        assert!(gate.is_not_blocked_user(USER).await.unwrap());
    }

    #[tokio::test]
    async fn test_block_and_unblock_round_trip() {
        let gate = test_gate().await;
        gate.database
            .grant_access(USER, AccessKind::Blocked)
            .await
            .unwrap();
        assert!(!gate.is_not_blocked_user(USER).await.unwrap());

        gate.database
            .disable_access(USER, AccessKind::Blocked)
            .await
            .unwrap();
        assert!(gate.is_not_blocked_user(USER).await.unwrap());
    }

    #[tokio::test]
    async fn test_authorized_guild_checks_the_list() {
        let gate = test_gate().await;
        assert!(gate.is_authorized_guild(Some(GUILD)));
        assert!(!gate.is_authorized_guild(Some(GUILD + 1)));
        assert!(!gate.is_authorized_guild(None));
    }

    #[tokio::test]
    async fn test_usage_left_boundary() {
        let gate = test_gate().await;
        // test database default limit is 10
        for _ in 0..9 {
            gate.database.increment_usage(USER).await.unwrap();
        }
        assert!(gate.has_daily_usage_left(USER).await.unwrap());

        gate.database.increment_usage(USER).await.unwrap();
        assert!(!gate.has_daily_usage_left(USER).await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_and_advanced_bypass_usage_limit() {
        let gate = test_gate().await;
        for _ in 0..50 {
            gate.database.increment_usage(ADMIN).await.unwrap();
            gate.database.increment_usage(USER).await.unwrap();
        }
        assert!(gate.has_daily_usage_left(ADMIN).await.unwrap());

        gate.database
            .grant_access(USER, AccessKind::Advanced)
            .await
            .unwrap();
        assert!(gate.has_daily_usage_left(USER).await.unwrap());
    }

    #[tokio::test]
    async fn test_channels_open_by_default_then_restricted() {
        let gate = test_gate().await;
        assert!(gate.is_allowed_channel(&context(USER)).await.unwrap());

        gate.database
            .add_allowed_channel(CHANNEL + 1, GUILD, ADMIN)
            .await
            .unwrap();
        assert!(!gate.is_allowed_channel(&context(USER)).await.unwrap());
        // admins bypass the restriction
        assert!(gate.is_allowed_channel(&context(ADMIN)).await.unwrap());

        gate.database
            .add_allowed_channel(CHANNEL, GUILD, ADMIN)
            .await
            .unwrap();
        assert!(gate.is_allowed_channel(&context(USER)).await.unwrap());
    }

    #[tokio::test]
    async fn test_allowed_channel_requires_guild_context() {
        let gate = test_gate().await;
        let dm = GateContext {
            user_id: USER,
            guild_id: None,
            channel_id: Some(CHANNEL),
        };
        assert!(!gate.is_allowed_channel(&dm).await.unwrap());
    }

    #[tokio::test]
    async fn test_first_failing_short_circuits_in_order() {
        let gate = test_gate().await;
        gate.database
            .grant_access(USER, AccessKind::Blocked)
            .await
            .unwrap();

        let guards = [
            Guard::AuthorizedGuild,
            Guard::NotBlockedUser,
            Guard::DailyUsageLeft,
        ];
        let failing = gate
            .first_failing(&guards, &context(USER))
            .await
            .unwrap();
        assert_eq!(failing, Some(Guard::NotBlockedUser));

        let failing = gate
            .first_failing(&guards, &context(ADMIN))
            .await
            .unwrap();
        assert_eq!(failing, None);
    }
}
