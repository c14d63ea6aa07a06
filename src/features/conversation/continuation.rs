//! Thread follow-up handling
//!
//! Every gateway message is offered here; anything that is not a follow-up
//! inside one of our open conversation threads is ignored. A qualifying
//! message either closes an over-window thread, bounces off the usage
//! limit, or replays bounded history to the provider recorded for the
//! thread.

use anyhow::{Context as _, Result};
use log::{error, info, warn};
use serenity::model::channel::{Channel, ChannelType, GuildChannel, Message};
use serenity::model::id::UserId;
use serenity::prelude::Context;
use serenity::utils::Colour;
use std::sync::Arc;

use crate::ai::{
    generate_response, normalize_history, AnthropicClient, ClaudeParams, ModelParams,
    ProviderResponse,
};
use crate::core::{chunk_message, Config, SystemPrompts};
use crate::database::{AccessKind, Database};
use crate::features::gate::Gate;

use super::{ConversationStore, ThreadSession, THREAD_PREFIX};

/// Reacts to new messages inside bot-created conversation threads.
pub struct ThreadConversationHandler {
    config: Arc<Config>,
    database: Database,
    conversations: ConversationStore,
    prompts: Arc<SystemPrompts>,
    anthropic: AnthropicClient,
    gate: Gate,
}

impl ThreadConversationHandler {
    pub fn new(
        config: Arc<Config>,
        database: Database,
        conversations: ConversationStore,
        prompts: Arc<SystemPrompts>,
        anthropic: AnthropicClient,
        gate: Gate,
    ) -> Self {
        ThreadConversationHandler {
            config,
            database,
            conversations,
            prompts,
            anthropic,
            gate,
        }
    }

    /// Handle one gateway message. Non-conversation messages are a no-op.
    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if msg.author.bot {
            return Ok(());
        }

        let bot_id = ctx.cache.current_user_id();
        let thread = match msg.channel_id.to_channel(ctx).await? {
            Channel::Guild(channel) if is_open_conversation_thread(&channel, bot_id) => channel,
            _ => return Ok(()),
        };

        // Blocked users are ignored outright, no reaction to react to.
        if self
            .database
            .has_active_access(msg.author.id.0, AccessKind::Blocked)
            .await?
        {
            return Ok(());
        }

        let window = self.config.claude_context_window;
        if exceeds_context_window(thread.message_count.unwrap_or(0) as usize, window) {
            info!("Thread {} exceeded the context window, closing", thread.id);
            self.close_thread(ctx, &thread).await?;
            return Ok(());
        }

        if !self.gate.has_daily_usage_left(msg.author.id.0).await? {
            thread
                .id
                .send_message(&ctx.http, |message| {
                    message.embed(|embed| {
                        embed
                            .description(
                                "**You have reached today's AI usage limit.** \
                                 Counters reset at midnight.",
                            )
                            .color(Colour::RED)
                    })
                })
                .await?;
            return Ok(());
        }

        let raw_history = thread
            .id
            .messages(&ctx.http, |retriever| retriever.limit(window as u64))
            .await
            .context("failed to read thread history")?;
        let history = normalize_history(
            raw_history
                .into_iter()
                .map(|message| (message.author.id == bot_id, message.content)),
        );

        let session = self.session_for(thread.id.0)?;
        let _ = thread.id.broadcast_typing(&ctx.http).await;

        match generate_response(
            &self.anthropic,
            &session.system_prompt,
            &history,
            &session.params,
        )
        .await
        {
            ProviderResponse::Success(text) => {
                for chunk in chunk_message(&text, self.config.max_chars_per_message) {
                    thread.id.say(&ctx.http, chunk).await?;
                }
                self.database.increment_usage(msg.author.id.0).await?;
            }
            failure => {
                error!(
                    "Provider call failed for thread {} ({failure:?})",
                    thread.id
                );
                thread
                    .id
                    .send_message(&ctx.http, |message| {
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

    /// The session recorded at thread creation, or a default-parameter
    /// session when the store was lost to a restart.
    fn session_for(&self, thread_id: u64) -> Result<ThreadSession> {
        if let Some(session) = self.conversations.get(thread_id) {
            return Ok(session);
        }
        warn!("No recorded parameters for thread {thread_id}; continuing with defaults");
        let model = self
            .config
            .claude_models
            .first()
            .cloned()
            .context("no Claude models configured")?;
        let params = ClaudeParams::new(
            model,
            self.config.claude_max_tokens,
            self.config.claude_temperature,
            self.config.claude_top_p,
        )?;
        let session = ThreadSession {
            system_prompt: self.prompts.talk.clone(),
            params: ModelParams::Claude(params),
        };
        self.conversations.insert(thread_id, session.clone());
        Ok(session)
    }

    /// Send the closing notice, then lock the thread for good.
    async fn close_thread(&self, ctx: &Context, thread: &GuildChannel) -> Result<()> {
        thread
            .id
            .send_message(&ctx.http, |message| {
                message.embed(|embed| {
                    embed
                        .description("Context limit reached, closing this conversation.")
                        .color(Colour::LIGHT_GREY)
                })
            })
            .await?;
        thread
            .id
            .edit_thread(&ctx.http, |edit| edit.archived(false).locked(true))
            .await
            .context("failed to lock thread")?;
        Ok(())
    }
}

/// A live conversation thread: public, bot-owned, prefixed, not closed.
fn is_open_conversation_thread(channel: &GuildChannel, bot_id: UserId) -> bool {
    let open = channel
        .thread_metadata
        .as_ref()
        .map_or(false, |metadata| !metadata.archived && !metadata.locked);
    matches!(channel.kind, ChannelType::PublicThread)
        && channel.owner_id == Some(bot_id)
        && thread_name_matches(&channel.name)
        && open
}

/// Whether a thread name carries the conversation prefix.
pub fn thread_name_matches(name: &str) -> bool {
    name.starts_with(THREAD_PREFIX)
}

/// One message over the window closes the thread.
pub fn exceeds_context_window(message_count: usize, window: usize) -> bool {
    message_count > window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_name_prefix() {
        assert!(thread_name_matches(">>> rust questions"));
        assert!(!thread_name_matches("general"));
        assert!(!thread_name_matches(" >>> padded"));
    }

    #[test]
    fn test_context_window_boundary() {
        assert!(!exceeds_context_window(29, 30));
        assert!(!exceeds_context_window(30, 30));
        assert!(exceeds_context_window(31, 30));
    }
}
