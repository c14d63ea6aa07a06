//! # Commands Layer
//!
//! Slash command definitions, handlers, and the dispatcher that runs each
//! command's guard list before its handler.

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

pub use context::BotContext;
pub use handler::SlashCommandHandler;
pub use registry::CommandRegistry;
pub use slash::{register_global_commands, register_guild_commands};

use anyhow::Result;
use log::{info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::features::gate::GateContext;

/// The one message shown for any guard failure. Which guard failed is
/// logged server-side only.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "You do not have permission to run this command.";

/// Routes interactions to handlers, guards first.
pub struct CommandDispatcher {
    ctx: Arc<BotContext>,
    registry: CommandRegistry,
}

impl CommandDispatcher {
    /// Build the dispatcher with every command family registered.
    pub fn new(ctx: Arc<BotContext>) -> Self {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(handlers::chat::ChatHandler));
        registry.register(Arc::new(handlers::talk::TalkHandler));
        registry.register(Arc::new(handlers::fixpy::FixpyHandler));
        registry.register(Arc::new(handlers::access::AccessHandler));
        registry.register(Arc::new(handlers::channels::ChannelHandler));
        registry.register(Arc::new(handlers::limits::LimitHandler));
        CommandDispatcher { ctx, registry }
    }

    /// Dispatch one slash command interaction.
    pub async fn dispatch(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let name = command.data.name.as_str();
        let Some(handler) = self.registry.get(name) else {
            warn!("No handler registered for command '{name}'");
            return Ok(());
        };

        let gate_context = GateContext {
            user_id: command.user.id.0,
            guild_id: command.guild_id.map(|id| id.0),
            channel_id: Some(command.channel_id.0),
        };
        if let Some(guard) = self
            .ctx
            .gate
            .first_failing(handler.guards(name), &gate_context)
            .await?
        {
            info!(
                "Denied '{name}' for user {}: {} check failed",
                command.user.id,
                guard.name()
            );
            respond_ephemeral(serenity_ctx, command, PERMISSION_DENIED_MESSAGE).await?;
            return Ok(());
        }

        handler
            .handle(Arc::clone(&self.ctx), serenity_ctx, command)
            .await
    }
}

/// Reply to an interaction with a caller-only-visible message.
pub async fn respond_ephemeral(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await?;
    Ok(())
}
