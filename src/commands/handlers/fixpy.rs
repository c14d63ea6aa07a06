//! /fixpy - opens a code modal, submission handled by the modal handler

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::component::InputTextStyle;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::respond_ephemeral;
use crate::commands::slash::get_number_option;
use crate::features::gate::Guard;

/// Custom id prefix routing modal submissions back to fixpy.
pub const FIXPY_MODAL_PREFIX: &str = "fixpy";

/// Handler for the /fixpy command
pub struct FixpyHandler;

#[async_trait]
impl SlashCommandHandler for FixpyHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["fixpy"]
    }

    fn guards(&self, _name: &str) -> &'static [Guard] {
        &[Guard::AuthorizedGuild, Guard::NotBlockedUser]
    }

    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let temperature = get_number_option(&command.data.options, "temperature")
            .map(|value| value as f32)
            .unwrap_or(ctx.config.claude_temperature);
        let top_p = get_number_option(&command.data.options, "top_p")
            .map(|value| value as f32)
            .unwrap_or(ctx.config.claude_top_p);
        info!("/fixpy from {}", command.user.id);

        if !(0.0..=1.0).contains(&temperature) {
            respond_ephemeral(
                serenity_ctx,
                command,
                "**temperature** must be between 0.0 and 1.0.",
            )
            .await?;
            return Ok(());
        }
        if !(0.0..=1.0).contains(&top_p) {
            respond_ephemeral(serenity_ctx, command, "**top_p** must be between 0.0 and 1.0.")
                .await?;
            return Ok(());
        }

        // Parameters ride in the custom id; the modal submission is a
        // separate interaction with no other way to carry them.
        let custom_id = format!("{FIXPY_MODAL_PREFIX}:{temperature}:{top_p}");
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(custom_id)
                            .title("Fix Python code")
                            .components(|components| {
                                components.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("code")
                                            .label("Python code")
                                            .style(InputTextStyle::Paragraph)
                                            .placeholder("Paste the code to fix...")
                                            .required(true)
                                    })
                                })
                            })
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
    fn test_guards_skip_usage_limit() {
        let handler = FixpyHandler;
        assert_eq!(
            handler.guards("fixpy"),
            &[Guard::AuthorizedGuild, Guard::NotBlockedUser]
        );
    }
}
