//! Access administration handlers: /grant_access, /disable_access, /ck_access

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::id::GuildId;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::respond_ephemeral;
use crate::commands::slash::{get_string_option, get_user_option};
use crate::database::AccessKind;
use crate::features::gate::Guard;

/// Handler for the access administration commands
pub struct AccessHandler;

#[async_trait]
impl SlashCommandHandler for AccessHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["grant_access", "disable_access", "ck_access"]
    }

    fn guards(&self, _name: &str) -> &'static [Guard] {
        &[Guard::AuthorizedGuild, Guard::AdminUser]
    }

    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let Some(target) = self.resolve_target(serenity_ctx, command).await? else {
            return Ok(());
        };

        match command.data.name.as_str() {
            "grant_access" => self.handle_grant(&ctx, serenity_ctx, command, target).await,
            "disable_access" => self.handle_disable(&ctx, serenity_ctx, command, target).await,
            "ck_access" => self.handle_check(&ctx, serenity_ctx, command, target).await,
            _ => Ok(()),
        }
    }
}

impl AccessHandler {
    /// Validate guild context and target membership; reply and return None
    /// on either precondition failing.
    async fn resolve_target(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<Option<u64>> {
        let Some(guild_id) = command.guild_id else {
            respond_ephemeral(
                serenity_ctx,
                command,
                "This command can only be used in a server.",
            )
            .await?;
            return Ok(None);
        };
        let target = get_user_option(&command.data.options, "user")
            .ok_or_else(|| anyhow::anyhow!("Missing user parameter"))?;

        if !is_guild_member(serenity_ctx, guild_id, target).await {
            respond_ephemeral(
                serenity_ctx,
                command,
                "That user is not a member of this server.",
            )
            .await?;
            return Ok(None);
        }
        Ok(Some(target))
    }

    async fn handle_grant(
        &self,
        ctx: &BotContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        target: u64,
    ) -> Result<()> {
        let kind = required_kind(command)?;
        ctx.database.grant_access(target, kind).await?;
        info!("Access type <{kind}> granted to user {target}");
        respond_ephemeral(
            serenity_ctx,
            command,
            &format!("Access type `{kind}` has been granted to <@{target}>."),
        )
        .await
    }

    async fn handle_disable(
        &self,
        ctx: &BotContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        target: u64,
    ) -> Result<()> {
        let kind = required_kind(command)?;
        let disabled = ctx.database.disable_access(target, kind).await?;
        if disabled {
            info!("Access type <{kind}> disabled for user {target}");
            respond_ephemeral(
                serenity_ctx,
                command,
                &format!("Access type `{kind}` has been disabled for <@{target}>."),
            )
            .await
        } else {
            respond_ephemeral(
                serenity_ctx,
                command,
                &format!("<@{target}> has no active `{kind}` access."),
            )
            .await
        }
    }

    async fn handle_check(
        &self,
        ctx: &BotContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        target: u64,
    ) -> Result<()> {
        let advanced = ctx
            .database
            .has_active_access(target, AccessKind::Advanced)
            .await?;
        let blocked = ctx
            .database
            .has_active_access(target, AccessKind::Blocked)
            .await?;

        let message = match (advanced, blocked) {
            (true, true) => {
                format!("<@{target}> has the access types `advanced` and `blocked`.")
            }
            (true, false) => format!("<@{target}> has the access type `advanced`."),
            (false, true) => format!("<@{target}> has the access type `blocked`."),
            (false, false) => format!("<@{target}> does not have any access type."),
        };
        respond_ephemeral(serenity_ctx, command, &message).await
    }
}

fn required_kind(command: &ApplicationCommandInteraction) -> Result<AccessKind> {
    get_string_option(&command.data.options, "type")
        .as_deref()
        .and_then(AccessKind::parse)
        .ok_or_else(|| anyhow::anyhow!("Missing or invalid access type parameter"))
}

/// Membership lookup via cache first, HTTP second.
async fn is_guild_member(serenity_ctx: &Context, guild_id: GuildId, user_id: u64) -> bool {
    guild_id
        .member(serenity_ctx, user_id)
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_covers_the_access_family() {
        let handler = AccessHandler;
        assert_eq!(
            handler.command_names(),
            &["grant_access", "disable_access", "ck_access"]
        );
        assert_eq!(
            handler.guards("grant_access"),
            &[Guard::AuthorizedGuild, Guard::AdminUser]
        );
    }
}
