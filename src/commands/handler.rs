//! Slash command handler trait
//!
//! Each handler processes one or more slash commands and declares the
//! ordered guard list the dispatcher must clear before `handle` runs.

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::features::gate::Guard;

use super::context::BotContext;

/// Trait for slash command handlers
///
/// Handlers are registered with a CommandRegistry and dispatched based on
/// command name. Guards run first; a handler can assume its guard list
/// passed by the time `handle` is called.
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    /// Guards required before `name` may run, evaluated in order.
    fn guards(&self, name: &str) -> &'static [Guard] {
        let _ = name;
        &[]
    }

    /// Handle the slash command
    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait must stay object-safe for registry storage
    fn _assert_object_safe(_: &dyn SlashCommandHandler) {}
}
