//! AI slash commands: /chat, /talk, /fixpy

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::core::Config;

/// Creates the AI-facing commands
pub fn create_commands(config: &Config) -> Vec<CreateApplicationCommand> {
    vec![
        create_chat_command(),
        create_talk_command(config),
        create_fixpy_command(),
    ]
}

/// Creates the chat command - single-turn reply in place
fn create_chat_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("chat")
        .description("Ask the assistant a single question")
        .create_option(|option| {
            option
                .name("prompt")
                .description("What to ask")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

/// Creates the talk command - opens a conversation thread
fn create_talk_command(config: &Config) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("talk")
        .description("Start a conversation thread with the assistant")
        .create_option(|option| {
            option
                .name("prompt")
                .description("Opening message")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("model")
                .description("Model to use for this conversation")
                .kind(CommandOptionType::String)
                .required(true);
            for model in &config.claude_models {
                option.add_string_choice(model, model);
            }
            option
        })
        .create_option(|option| {
            option
                .name("temperature")
                .description("Sampling temperature, 0.0 to 1.0")
                .kind(CommandOptionType::Number)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("top_p")
                .description("Nucleus sampling, 0.0 to 1.0")
                .kind(CommandOptionType::Number)
                .required(false)
        });
    command
}

/// Creates the fixpy command - opens a code modal
fn create_fixpy_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("fixpy")
        .description("Find and fix bugs in a piece of Python code")
        .create_option(|option| {
            option
                .name("temperature")
                .description("Sampling temperature, 0.0 to 1.0")
                .kind(CommandOptionType::Number)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("top_p")
                .description("Nucleus sampling, 0.0 to 1.0")
                .kind(CommandOptionType::Number)
                .required(false)
        })
        .to_owned()
}
