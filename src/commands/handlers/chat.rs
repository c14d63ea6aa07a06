//! /chat - single-turn GPT reply

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::ai::{generate_response, ChatMessage, GptParams, ModelParams, ProviderResponse};
use crate::commands::context::BotContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;
use crate::core::chunk_message;
use crate::features::gate::Guard;

const GENERIC_FAILURE: &str =
    "**Error:** something went wrong while generating a reply. Please try again later.";

/// Handler for the /chat command
pub struct ChatHandler;

#[async_trait]
impl SlashCommandHandler for ChatHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["chat"]
    }

    fn guards(&self, _name: &str) -> &'static [Guard] {
        &[
            Guard::AuthorizedGuild,
            Guard::NotBlockedUser,
            Guard::DailyUsageLeft,
        ]
    }

    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let prompt = get_string_option(&command.data.options, "prompt")
            .ok_or_else(|| anyhow::anyhow!("Missing prompt parameter"))?;
        info!(
            "[{request_id}] /chat from {}: {}",
            command.user.id,
            prompt.chars().take(40).collect::<String>()
        );

        // Defer within the 3-second interaction window
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            })
            .await?;

        let params = ModelParams::Gpt(GptParams::new(
            &ctx.config.chat_model,
            ctx.config.gpt_max_tokens,
            ctx.config.gpt_temperature,
            ctx.config.gpt_top_p,
        )?);
        let history = [ChatMessage::user(prompt)];

        match generate_response(&ctx.anthropic, &ctx.prompts.chat, &history, &params).await {
            ProviderResponse::Success(text) => {
                let chunks = chunk_message(&text, ctx.config.max_chars_per_message);
                let mut chunks = chunks.iter();
                if let Some(first) = chunks.next() {
                    command
                        .edit_original_interaction_response(&serenity_ctx.http, |response| {
                            response.content(first)
                        })
                        .await?;
                }
                for chunk in chunks {
                    command
                        .create_followup_message(&serenity_ctx.http, |message| {
                            message.content(chunk)
                        })
                        .await?;
                }
                ctx.database.increment_usage(command.user.id.0).await?;
                info!("[{request_id}] /chat completed");
            }
            failure => {
                error!("[{request_id}] /chat provider failure: {failure:?}");
                command
                    .edit_original_interaction_response(&serenity_ctx.http, |response| {
                        response.content(GENERIC_FAILURE)
                    })
                    .await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_and_guards() {
        let handler = ChatHandler;
        assert_eq!(handler.command_names(), &["chat"]);
        assert_eq!(
            handler.guards("chat"),
            &[
                Guard::AuthorizedGuild,
                Guard::NotBlockedUser,
                Guard::DailyUsageLeft,
            ]
        );
    }
}
