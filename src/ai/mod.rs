//! # AI Layer
//!
//! Model parameter types, chat history normalization, and the two provider
//! adapters (OpenAI chat completions, Anthropic messages) behind a single
//! outcome type. Nothing above this layer sees a provider error as an
//! `Err`: every call resolves to a [`ProviderResponse`].
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod anthropic;
pub mod chat;
pub mod gpt;
pub mod params;

pub use anthropic::AnthropicClient;
pub use chat::{normalize_history, ChatMessage, ChatRole};
pub use params::{ClaudeParams, GptParams, ModelParams};

use std::time::Duration;

/// Hard deadline on a single provider call.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Outcome of one provider call.
///
/// `ProviderError` covers everything the provider or transport reported
/// (rate limit, bad request, timeout, connection failure) and is the
/// caller's cue that retrying later might help. `UnknownError` is anything
/// else; full detail is logged where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    Success(String),
    ProviderError,
    UnknownError,
}

impl ProviderResponse {
    /// The generated text, when there is one.
    pub fn text(&self) -> Option<&str> {
        match self {
            ProviderResponse::Success(text) => Some(text),
            _ => None,
        }
    }
}

/// Relay one conversation turn to the provider selected by `params`.
pub async fn generate_response(
    anthropic: &AnthropicClient,
    system_prompt: &str,
    history: &[ChatMessage],
    params: &ModelParams,
) -> ProviderResponse {
    match params {
        ModelParams::Gpt(gpt_params) => {
            gpt::generate_gpt_response(system_prompt, history, gpt_params).await
        }
        ModelParams::Claude(claude_params) => {
            anthropic.generate(system_prompt, history, claude_params).await
        }
    }
}
