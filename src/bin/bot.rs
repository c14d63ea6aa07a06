use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use aria::ai::AnthropicClient;
use aria::commands::{
    register_global_commands, register_guild_commands, BotContext, CommandDispatcher,
};
use aria::core::{Config, SystemPrompts};
use aria::message_components::ModalHandler;
use aria::{ConversationStore, Database, ThreadConversationHandler, UsageResetScheduler};

struct Handler {
    config: Arc<Config>,
    dispatcher: CommandDispatcher,
    modal_handler: ModalHandler,
    conversation_handler: ThreadConversationHandler,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if let Err(e) = self.conversation_handler.handle_message(&ctx, &msg).await {
            error!("Error handling message: {e:#}");
            if let Err(why) = msg
                .channel_id
                .say(
                    &ctx.http,
                    "Sorry, I encountered an error processing your message.",
                )
                .await
            {
                error!("Failed to send error message: {why}");
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected and ready!", ready.user.name);
        info!("Connected to {} guilds", ready.guilds.len());
        info!("Bot ID: {}", ready.user.id);

        // Guild commands update instantly and suit development; global
        // registration can take up to an hour to propagate.
        if let Some(guild_id) = self.config.discord_guild_id.map(GuildId) {
            info!("Development mode: registering commands for guild {guild_id}");
            if let Err(e) = register_guild_commands(&ctx, guild_id, &self.config).await {
                error!("Failed to register guild slash commands: {e:#}");
            }
        } else {
            info!("Production mode: registering commands globally");
            if let Err(e) = register_global_commands(&ctx, &self.config).await {
                error!("Failed to register global slash commands: {e:#}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self.dispatcher.dispatch(&ctx, &command).await {
                    error!(
                        "Error handling slash command '{}': {e:#}",
                        command.data.name
                    );

                    let error_message =
                        "Sorry, I encountered an error processing your command. Please try again.";

                    // The command may or may not have responded already; try
                    // the edit first and fall back to a fresh response.
                    #[allow(clippy::redundant_pattern_matching)]
                    if let Err(_) = command
                        .edit_original_interaction_response(&ctx.http, |response| {
                            response.content(error_message)
                        })
                        .await
                    {
                        let _ = command
                            .create_interaction_response(&ctx.http, |response| {
                                response
                                    .kind(serenity::model::application::interaction::InteractionResponseType::ChannelMessageWithSource)
                                    .interaction_response_data(|message| {
                                        message.content(error_message).ephemeral(true)
                                    })
                            })
                            .await;
                    }
                }
            }
            Interaction::ModalSubmit(modal) => {
                if let Err(e) = self.modal_handler.handle_modal_submit(&ctx, &modal).await {
                    error!(
                        "Error handling modal submit '{}': {e:#}",
                        modal.data.custom_id
                    );

                    let error_message =
                        "Sorry, I encountered an error processing your submission. Please try again.";

                    #[allow(clippy::redundant_pattern_matching)]
                    if let Err(_) = modal
                        .edit_original_interaction_response(&ctx.http, |response| {
                            response.content(error_message)
                        })
                        .await
                    {
                        let _ = modal
                            .create_interaction_response(&ctx.http, |response| {
                                response
                                    .kind(serenity::model::application::interaction::InteractionResponseType::ChannelMessageWithSource)
                                    .interaction_response_data(|message| {
                                        message.content(error_message).ephemeral(true)
                                    })
                            })
                            .await;
                    }
                }
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Arc::new(Config::from_env()?);

    // The openai crate reads its key from the environment, not from config
    std::env::set_var("OPENAI_API_KEY", &config.openai_api_key);
    std::env::set_var("OPENAI_KEY", &config.openai_api_key);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting aria Discord bot...");

    let database = Database::new(
        &config.database_path,
        config.default_daily_limit,
        config.utc_offset,
    )
    .await?;
    let prompts = Arc::new(SystemPrompts::load(&config.prompts_path)?);
    let anthropic = AnthropicClient::new(config.anthropic_api_key.clone());
    let conversations = ConversationStore::new();

    let context = Arc::new(BotContext::new(
        Arc::clone(&config),
        database.clone(),
        conversations.clone(),
        Arc::clone(&prompts),
        anthropic.clone(),
    ));

    let handler = Handler {
        config: Arc::clone(&config),
        dispatcher: CommandDispatcher::new(Arc::clone(&context)),
        modal_handler: ModalHandler::new(Arc::clone(&context)),
        conversation_handler: ThreadConversationHandler::new(
            Arc::clone(&config),
            database.clone(),
            conversations,
            prompts,
            anthropic,
            context.gate.clone(),
        ),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    // Zero the usage counters once per day at local midnight
    let scheduler = UsageResetScheduler::new(database, config.utc_offset);
    tokio::spawn(async move {
        scheduler.run().await;
    });

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
