//! Shared context for command handlers
//!
//! One `BotContext` is built at startup and handed (behind an `Arc`) to the
//! dispatcher, every command handler, and the modal handler. There is no
//! other shared mutable state.

use std::sync::Arc;

use crate::ai::AnthropicClient;
use crate::core::{Config, SystemPrompts};
use crate::database::Database;
use crate::features::conversation::ConversationStore;
use crate::features::gate::Gate;

/// Services shared by all command handlers.
#[derive(Clone)]
pub struct BotContext {
    pub config: Arc<Config>,
    pub database: Database,
    pub conversations: ConversationStore,
    pub prompts: Arc<SystemPrompts>,
    pub anthropic: AnthropicClient,
    pub gate: Gate,
}

impl BotContext {
    pub fn new(
        config: Arc<Config>,
        database: Database,
        conversations: ConversationStore,
        prompts: Arc<SystemPrompts>,
        anthropic: AnthropicClient,
    ) -> Self {
        let gate = Gate::new(
            database.clone(),
            config.admin_user_ids.clone(),
            config.authorized_guild_ids.clone(),
        );
        BotContext {
            config,
            database,
            conversations,
            prompts,
            anthropic,
            gate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_context_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<BotContext>();
    }
}
