//! Channel allow-list handlers: /add_ch, /rm_ch, /ls_ch

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
use crate::commands::slash::get_channel_option;
use crate::features::gate::Guard;

/// Handler for the channel allow-list commands
pub struct ChannelHandler;

#[async_trait]
impl SlashCommandHandler for ChannelHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["add_ch", "rm_ch", "ls_ch"]
    }

    fn guards(&self, name: &str) -> &'static [Guard] {
        match name {
            "ls_ch" => &[Guard::AuthorizedGuild, Guard::NotBlockedUser],
            _ => &[Guard::AuthorizedGuild, Guard::AdminUser],
        }
    }

    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let Some(guild_id) = command.guild_id else {
            respond_ephemeral(
                serenity_ctx,
                command,
                "This command can only be used in a server.",
            )
            .await?;
            return Ok(());
        };

        match command.data.name.as_str() {
            "add_ch" => {
                let channel = get_channel_option(&command.data.options, "channel")
                    .ok_or_else(|| anyhow::anyhow!("Missing channel parameter"))?;
                ctx.database
                    .add_allowed_channel(channel, guild_id.0, command.user.id.0)
                    .await?;
                info!(
                    "{} added channel {channel} to the allow-list of guild {guild_id}",
                    command.user.id
                );
                respond_ephemeral(
                    serenity_ctx,
                    command,
                    &format!("Channel <#{channel}> added to the allowed command channels."),
                )
                .await
            }
            "rm_ch" => {
                let channel = get_channel_option(&command.data.options, "channel")
                    .ok_or_else(|| anyhow::anyhow!("Missing channel parameter"))?;
                let removed = ctx.database.remove_allowed_channel(channel).await?;
                if removed {
                    info!(
                        "{} removed channel {channel} from the allow-list of guild {guild_id}",
                        command.user.id
                    );
                    respond_ephemeral(
                        serenity_ctx,
                        command,
                        &format!("Channel <#{channel}> removed from the allowed command channels."),
                    )
                    .await
                } else {
                    respond_ephemeral(
                        serenity_ctx,
                        command,
                        &format!("Channel <#{channel}> is not in the allowed list."),
                    )
                    .await
                }
            }
            "ls_ch" => {
                let channels = ctx.database.allowed_channels(guild_id.0).await?;
                if channels.is_empty() {
                    respond_ephemeral(
                        serenity_ctx,
                        command,
                        "No allowed channels are configured. Commands run anywhere in this server.",
                    )
                    .await
                } else {
                    let listing = channels
                        .iter()
                        .map(|id| format!("<#{id}>"))
                        .collect::<Vec<_>>()
                        .join("\n");
                    command
                        .create_interaction_response(&serenity_ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message
                                        .embed(|embed| {
                                            embed
                                                .title("Allowed command channels")
                                                .description(
                                                    "Commands only run in the channels below.",
                                                )
                                                .field("channels", listing, false)
                                                .color(Colour::BLURPLE)
                                        })
                                        .ephemeral(true)
                                })
                        })
                        .await?;
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_is_not_admin_gated() {
        let handler = ChannelHandler;
        assert_eq!(
            handler.guards("ls_ch"),
            &[Guard::AuthorizedGuild, Guard::NotBlockedUser]
        );
        assert_eq!(
            handler.guards("add_ch"),
            &[Guard::AuthorizedGuild, Guard::AdminUser]
        );
        assert_eq!(
            handler.guards("rm_ch"),
            &[Guard::AuthorizedGuild, Guard::AdminUser]
        );
    }
}
