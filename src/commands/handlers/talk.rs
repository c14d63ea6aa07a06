//! /talk - opens a conversation thread and makes the first Claude turn

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use serenity::utils::Colour;
use std::sync::Arc;
use uuid::Uuid;

use crate::ai::{generate_response, ChatMessage, ClaudeParams, ModelParams, ProviderResponse};
use crate::commands::context::BotContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::respond_ephemeral;
use crate::commands::slash::{get_number_option, get_string_option};
use crate::core::chunk_message;
use crate::features::conversation::{ThreadSession, THREAD_PREFIX};
use crate::features::gate::Guard;

/// Handler for the /talk command
pub struct TalkHandler;

#[async_trait]
impl SlashCommandHandler for TalkHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["talk"]
    }

    fn guards(&self, _name: &str) -> &'static [Guard] {
        &[
            Guard::AuthorizedGuild,
            Guard::NotBlockedUser,
            Guard::AllowedChannel,
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
        let model = get_string_option(&command.data.options, "model")
            .ok_or_else(|| anyhow::anyhow!("Missing model parameter"))?;
        let temperature = get_number_option(&command.data.options, "temperature")
            .map(|value| value as f32)
            .unwrap_or(ctx.config.claude_temperature);
        let top_p = get_number_option(&command.data.options, "top_p")
            .map(|value| value as f32)
            .unwrap_or(ctx.config.claude_top_p);
        info!(
            "[{request_id}] /talk from {}: {}",
            command.user.id,
            prompt.chars().take(40).collect::<String>()
        );

        if !(0.0..=ClaudeParams::TEMPERATURE_CEILING).contains(&temperature) {
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
        let params = ModelParams::Claude(ClaudeParams::new(
            model.clone(),
            ctx.config.claude_max_tokens,
            temperature,
            top_p,
        )?);

        // Announce publicly; the thread hangs off this message.
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.embed(|embed| {
                            embed
                                .description(format!(
                                    "<@{}> **started a conversation**",
                                    command.user.id
                                ))
                                .field("model", &model, true)
                                .field("temperature", temperature, true)
                                .field("top_p", top_p, true)
                                .field("message", &prompt, false)
                                .color(Colour::BLURPLE)
                        })
                    })
            })
            .await?;
        let announce = command.get_interaction_response(&serenity_ctx.http).await?;

        let thread = match announce
            .channel_id
            .create_public_thread(&serenity_ctx.http, announce.id, |builder| {
                builder.name(thread_title(&prompt)).auto_archive_duration(60)
            })
            .await
        {
            Ok(thread) => thread,
            Err(err) => {
                // Platform-side failure (permissions, rate limit); report
                // distinctly instead of the generic apology.
                error!("[{request_id}] Thread creation failed: {err}");
                command
                    .create_followup_message(&serenity_ctx.http, |message| {
                        message
                            .content("**Discord error:** could not create the thread. Please report this to an administrator.")
                            .ephemeral(true)
                    })
                    .await?;
                return Ok(());
            }
        };

        ctx.conversations.insert(
            thread.id.0,
            ThreadSession {
                system_prompt: ctx.prompts.talk.clone(),
                params: params.clone(),
            },
        );

        let _ = thread.id.broadcast_typing(&serenity_ctx.http).await;
        let history = [ChatMessage::user(prompt)];
        match generate_response(&ctx.anthropic, &ctx.prompts.talk, &history, &params).await {
            ProviderResponse::Success(text) => {
                for chunk in chunk_message(&text, ctx.config.max_chars_per_message) {
                    thread.id.say(&serenity_ctx.http, chunk).await?;
                }
                ctx.database.increment_usage(command.user.id.0).await?;
                info!("[{request_id}] /talk thread {} started", thread.id);
            }
            failure => {
                error!("[{request_id}] /talk provider failure: {failure:?}");
                thread
                    .id
                    .send_message(&serenity_ctx.http, |message| {
                        message.embed(|embed| {
                            embed
                                .description(
                                    "**Error:** something went wrong while generating a reply. \
                                     Please try again.",
                                )
                                .color(Colour::RED)
                        })
                    })
                    .await?;
            }
        }
        Ok(())
    }
}

/// Thread title: prefix plus a short prompt excerpt.
fn thread_title(prompt: &str) -> String {
    let excerpt: String = prompt.chars().take(30).collect();
    format!("{THREAD_PREFIX} {}", excerpt.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards_include_channel_and_usage() {
        let handler = TalkHandler;
        assert_eq!(
            handler.guards("talk"),
            &[
                Guard::AuthorizedGuild,
                Guard::NotBlockedUser,
                Guard::AllowedChannel,
                Guard::DailyUsageLeft,
            ]
        );
    }

    #[test]
    fn test_thread_title_is_prefixed_and_bounded() {
        let title = thread_title("short prompt");
        assert!(title.starts_with(THREAD_PREFIX));
        assert!(title.contains("short prompt"));

        let long = thread_title(&"あ".repeat(100));
        assert!(long.chars().count() <= THREAD_PREFIX.chars().count() + 31);
    }
}
