//! Modal interaction handling
//!
//! Only one modal exists today: the fixpy code form. Its sampling
//! parameters travel inside the modal custom id because a modal submission
//! is a fresh interaction with no other state attached.

use anyhow::Result;
use log::{error, info};
use serenity::model::application::component::ActionRowComponent;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::ai::{generate_response, ChatMessage, ClaudeParams, ModelParams, ProviderResponse};
use crate::commands::context::BotContext;
use crate::commands::handlers::fixpy::FIXPY_MODAL_PREFIX;
use crate::core::chunk_message;

const GENERIC_FAILURE: &str =
    "**Error:** something went wrong while reviewing the code. Please try again later.";

/// Handler for all modal submit interactions
pub struct ModalHandler {
    ctx: Arc<BotContext>,
}

impl ModalHandler {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        ModalHandler { ctx }
    }

    /// Route one modal submission by custom id.
    pub async fn handle_modal_submit(
        &self,
        serenity_ctx: &Context,
        interaction: &ModalSubmitInteraction,
    ) -> Result<()> {
        let custom_id = interaction.data.custom_id.as_str();
        info!(
            "Processing modal submit: {custom_id} from user {}",
            interaction.user.id
        );

        match parse_fixpy_custom_id(custom_id) {
            Some((temperature, top_p)) => {
                self.handle_fixpy_submit(serenity_ctx, interaction, temperature, top_p)
                    .await
            }
            None => {
                interaction
                    .create_interaction_response(&serenity_ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content("Unknown modal submission.").ephemeral(true)
                            })
                    })
                    .await?;
                Ok(())
            }
        }
    }

    async fn handle_fixpy_submit(
        &self,
        serenity_ctx: &Context,
        interaction: &ModalSubmitInteraction,
        temperature: f32,
        top_p: f32,
    ) -> Result<()> {
        let code = extract_input(interaction, "code")
            .ok_or_else(|| anyhow::anyhow!("Modal submission without code input"))?;

        // Defer ephemerally; review replies are for the submitter only.
        interaction
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                    .interaction_response_data(|message| message.ephemeral(true))
            })
            .await?;

        let params = ModelParams::Claude(ClaudeParams::new(
            &self.ctx.config.fixpy_model,
            self.ctx.config.claude_max_tokens,
            temperature,
            top_p,
        )?);
        let history = [ChatMessage::user(code)];

        match generate_response(
            &self.ctx.anthropic,
            &self.ctx.prompts.fixpy,
            &history,
            &params,
        )
        .await
        {
            ProviderResponse::Success(text) => {
                let chunks = chunk_message(&text, self.ctx.config.max_chars_per_message);
                let mut chunks = chunks.iter();
                if let Some(first) = chunks.next() {
                    interaction
                        .edit_original_interaction_response(&serenity_ctx.http, |response| {
                            response.content(first)
                        })
                        .await?;
                }
                for chunk in chunks {
                    interaction
                        .create_followup_message(&serenity_ctx.http, |message| {
                            message.content(chunk).ephemeral(true)
                        })
                        .await?;
                }
            }
            failure => {
                error!("fixpy provider failure: {failure:?}");
                interaction
                    .edit_original_interaction_response(&serenity_ctx.http, |response| {
                        response.content(GENERIC_FAILURE)
                    })
                    .await?;
            }
        }
        Ok(())
    }
}

/// Parse `fixpy:{temperature}:{top_p}` custom ids.
fn parse_fixpy_custom_id(custom_id: &str) -> Option<(f32, f32)> {
    let rest = custom_id.strip_prefix(FIXPY_MODAL_PREFIX)?.strip_prefix(':')?;
    let (temperature, top_p) = rest.split_once(':')?;
    Some((temperature.parse().ok()?, top_p.parse().ok()?))
}

/// Value of the input text component named `custom_id`, if present.
fn extract_input(interaction: &ModalSubmitInteraction, custom_id: &str) -> Option<String> {
    for row in &interaction.data.components {
        for component in &row.components {
            if let ActionRowComponent::InputText(input) = component {
                if input.custom_id == custom_id {
                    return Some(input.value.clone());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixpy_custom_id() {
        assert_eq!(parse_fixpy_custom_id("fixpy:0.7:0.9"), Some((0.7, 0.9)));
        assert_eq!(parse_fixpy_custom_id("fixpy:1:0"), Some((1.0, 0.0)));
    }

    #[test]
    fn test_parse_rejects_other_ids() {
        assert_eq!(parse_fixpy_custom_id("helpmodal"), None);
        assert_eq!(parse_fixpy_custom_id("fixpy:nan-ish:"), None);
        assert_eq!(parse_fixpy_custom_id("fixpy:0.7"), None);
    }
}
