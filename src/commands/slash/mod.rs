//! # Slash Commands (/)
//!
//! Discord-native slash command definitions and registration.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

mod access;
mod chat;
mod channels;
mod limits;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

use crate::core::Config;

/// Creates all slash command definitions
pub fn create_slash_commands(config: &Config) -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();

    // AI commands
    commands.extend(chat::create_commands(config));

    // Access administration
    commands.extend(access::create_commands());

    // Channel allow-list administration
    commands.extend(channels::create_commands());

    // Usage limit commands
    commands.extend(limits::create_commands());

    commands
}

/// Registers all slash commands globally (may take up to an hour to propagate)
pub async fn register_global_commands(ctx: &Context, config: &Config) -> Result<()> {
    let slash_commands = create_slash_commands(config);
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for a specific guild (instant, for development)
pub async fn register_guild_commands(
    ctx: &Context,
    guild_id: GuildId,
    config: &Config,
) -> Result<()> {
    let slash_commands = create_slash_commands(config);
    let count = slash_commands.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// Utility function to get float option from slash command
pub fn get_number_option(options: &[CommandDataOption], name: &str) -> Option<f64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_f64())
}

/// Utility function to get user option from slash command
pub fn get_user_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .and_then(|s| s.parse().ok())
}

/// Utility function to get channel option from slash command
pub fn get_channel_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn test_config() -> Config {
        Config {
            discord_token: "token".to_string(),
            discord_guild_id: None,
            admin_user_ids: vec![1],
            authorized_guild_ids: vec![2],
            database_path: ":memory:".to_string(),
            log_level: "info".to_string(),
            openai_api_key: "sk-test".to_string(),
            anthropic_api_key: "sk-ant-test".to_string(),
            chat_model: "gpt-test".to_string(),
            fixpy_model: "claude-test".to_string(),
            claude_models: vec!["claude-a".to_string(), "claude-b".to_string()],
            claude_context_window: 30,
            claude_max_tokens: 1024,
            claude_temperature: 1.0,
            claude_top_p: 0.95,
            gpt_max_tokens: 1024,
            gpt_temperature: 1.0,
            gpt_top_p: 1.0,
            max_chars_per_message: 2000,
            default_daily_limit: 10,
            utc_offset: FixedOffset::east_opt(0).unwrap(),
            prompts_path: "prompts.yaml".to_string(),
        }
    }

    #[test]
    fn test_all_commands_defined() {
        let commands = create_slash_commands(&test_config());

        let command_names: Vec<String> = commands
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect();

        let expected = [
            "chat",
            "talk",
            "fixpy",
            "grant_access",
            "disable_access",
            "ck_access",
            "add_ch",
            "rm_ch",
            "ls_ch",
            "limit",
            "ck_limit",
        ];
        assert_eq!(commands.len(), expected.len());
        for name in expected {
            assert!(
                command_names.contains(&name.to_string()),
                "Missing command: {name}"
            );
        }
    }
}
