//! Usage limit handlers: /limit, /ck_limit

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use serenity::utils::Colour;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::respond_ephemeral;
use crate::commands::slash::get_integer_option;
use crate::features::gate::Guard;

/// Handler for the usage limit commands
pub struct LimitHandler;

#[async_trait]
impl SlashCommandHandler for LimitHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["limit", "ck_limit"]
    }

    fn guards(&self, name: &str) -> &'static [Guard] {
        match name {
            "limit" => &[
                Guard::AuthorizedGuild,
                Guard::AdminUser,
                Guard::AllowedChannel,
            ],
            _ => &[Guard::AuthorizedGuild, Guard::NotBlockedUser],
        }
    }

    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "limit" => self.handle_set_limit(&ctx, serenity_ctx, command).await,
            "ck_limit" => self.handle_check_limit(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl LimitHandler {
    async fn handle_set_limit(
        &self,
        ctx: &BotContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let limit = get_integer_option(&command.data.options, "limit")
            .ok_or_else(|| anyhow::anyhow!("Missing limit parameter"))?;
        if limit < 1 {
            respond_ephemeral(
                serenity_ctx,
                command,
                "**limit** must be a positive integer.",
            )
            .await?;
            return Ok(());
        }

        ctx.database.set_default_daily_limit(limit).await?;
        info!("{} set the default daily limit to {limit}", command.user.id);
        respond_ephemeral(
            serenity_ctx,
            command,
            &format!("Default daily usage limit set to {limit}/day."),
        )
        .await
    }

    async fn handle_check_limit(
        &self,
        ctx: &BotContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.0;
        let unlimited =
            ctx.gate.is_admin_user(user_id) || ctx.gate.is_advanced_user(user_id).await?;
        let usage = ctx.database.user_daily_usage(user_id).await?;
        let limit = ctx.database.user_daily_limit(user_id).await?;

        let (used, remaining) = if unlimited {
            (format!("{usage} / ∞"), "∞".to_string())
        } else {
            (
                format!("{usage} / {limit}"),
                (limit - usage).max(0).to_string(),
            )
        };

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .embed(|embed| {
                                embed
                                    .description(format!("Usage for <@{user_id}>"))
                                    .field("used", used, true)
                                    .field("remaining", remaining, true)
                                    .field("note", "Counters reset at midnight.", false)
                                    .color(Colour::BLUE)
                            })
                            .ephemeral(true)
                    })
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_is_admin_gated_checking_is_not() {
        let handler = LimitHandler;
        assert_eq!(
            handler.guards("limit"),
            &[
                Guard::AuthorizedGuild,
                Guard::AdminUser,
                Guard::AllowedChannel,
            ]
        );
        assert_eq!(
            handler.guards("ck_limit"),
            &[Guard::AuthorizedGuild, Guard::NotBlockedUser]
        );
    }
}
