//! Environment-backed configuration
//!
//! All runtime knobs come from the process environment (a `.env` file is
//! loaded by the binary before this runs). Identity allow-lists are parsed
//! once here; nothing else in the crate touches `std::env`.

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use std::env;

/// Immutable bot configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// When set, slash commands are registered guild-scoped (instant
    /// updates, used during development). Global registration otherwise.
    pub discord_guild_id: Option<u64>,
    pub admin_user_ids: Vec<u64>,
    pub authorized_guild_ids: Vec<u64>,
    pub database_path: String,
    pub log_level: String,
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    /// Model used by the single-turn `/chat` command.
    pub chat_model: String,
    /// Claude model used by the `/fixpy` command.
    pub fixpy_model: String,
    /// Claude models offered as choices on `/talk`.
    pub claude_models: Vec<String>,
    pub claude_context_window: usize,
    pub claude_max_tokens: u32,
    pub claude_temperature: f32,
    pub claude_top_p: f32,
    pub gpt_max_tokens: u32,
    pub gpt_temperature: f32,
    pub gpt_top_p: f32,
    /// Upper bound on a single outgoing message, clamped to Discord's 2000.
    pub max_chars_per_message: usize,
    /// Fallback daily call limit when no admin-set default exists.
    pub default_daily_limit: i64,
    /// Offset defining "local midnight" for the usage reset.
    pub utc_offset: FixedOffset,
    pub prompts_path: String,
}

impl Config {
    /// Build the configuration from the environment.
    ///
    /// Missing required variables and malformed values fail fast with a
    /// message naming the offending variable.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            discord_token: required("DISCORD_TOKEN")?,
            discord_guild_id: env::var("DISCORD_GUILD_ID")
                .ok()
                .map(|raw| {
                    raw.parse::<u64>()
                        .context("DISCORD_GUILD_ID is not a valid id")
                })
                .transpose()?,
            admin_user_ids: parse_id_list(&required("ADMIN_USER_IDS")?)
                .context("ADMIN_USER_IDS")?,
            authorized_guild_ids: parse_id_list(&required("AUTHORIZED_GUILD_IDS")?)
                .context("AUTHORIZED_GUILD_IDS")?,
            database_path: or_default("DATABASE_PATH", "aria.db"),
            log_level: or_default("LOG_LEVEL", "info"),
            openai_api_key: required("OPENAI_API_KEY")?,
            anthropic_api_key: required("ANTHROPIC_API_KEY")?,
            chat_model: required("CHAT_MODEL")?,
            fixpy_model: required("FIXPY_MODEL")?,
            claude_models: parse_model_list(&required("CLAUDE_MODELS")?)?,
            claude_context_window: parse_or_default("CLAUDE_CONTEXT_WINDOW", 30)?,
            claude_max_tokens: parse_or_default("CLAUDE_MAX_TOKENS", 1024)?,
            claude_temperature: parse_or_default("CLAUDE_TEMPERATURE", 1.0)?,
            claude_top_p: parse_or_default("CLAUDE_TOP_P", 0.95)?,
            gpt_max_tokens: parse_or_default("GPT_MAX_TOKENS", 1024)?,
            gpt_temperature: parse_or_default("GPT_TEMPERATURE", 1.0)?,
            gpt_top_p: parse_or_default("GPT_TOP_P", 1.0)?,
            max_chars_per_message: parse_or_default("MAX_CHARS_PER_MESSAGE", 2000)?,
            default_daily_limit: parse_or_default("DEFAULT_DAILY_LIMIT", 10)?,
            utc_offset: parse_utc_offset(&or_default("UTC_OFFSET", "+00:00"))?,
            prompts_path: or_default("PROMPTS_PATH", "prompts.yaml"),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("missing required environment variable {name}"))
}

fn or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or_default<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated list of Discord snowflake ids.
fn parse_id_list(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<u64>()
                .with_context(|| format!("invalid id entry: {entry}"))
        })
        .collect()
}

/// Parse a comma-separated list of model identifiers.
fn parse_model_list(raw: &str) -> Result<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect();
    if models.is_empty() {
        bail!("CLAUDE_MODELS must name at least one model");
    }
    Ok(models)
}

/// Parse a `+HH:MM` / `-HH:MM` UTC offset.
fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => bail!("invalid UTC offset (expected +HH:MM or -HH:MM): {raw}"),
    };
    let (hours, minutes) = rest
        .split_once(':')
        .with_context(|| format!("invalid UTC offset (expected +HH:MM or -HH:MM): {raw}"))?;
    let hours: i32 = hours
        .parse()
        .with_context(|| format!("invalid hours in UTC offset: {raw}"))?;
    let minutes: i32 = minutes
        .parse()
        .with_context(|| format!("invalid minutes in UTC offset: {raw}"))?;
    if hours > 23 || minutes > 59 {
        bail!("UTC offset out of range: {raw}");
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("UTC offset out of range: {raw}"))
}
