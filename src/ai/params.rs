//! Validated model parameters
//!
//! Each provider enforces its own numeric ranges, so the parameters are a
//! sum type with one validating constructor per variant. A value of these
//! types always satisfies its provider's ranges; out-of-range input fails
//! construction and nothing is built.

use anyhow::{bail, Result};

/// Parameters for one conversation, tagged by provider.
#[derive(Debug, Clone)]
pub enum ModelParams {
    Gpt(GptParams),
    Claude(ClaudeParams),
}

impl ModelParams {
    /// The model identifier the provider will receive.
    pub fn model(&self) -> &str {
        match self {
            ModelParams::Gpt(params) => &params.model,
            ModelParams::Claude(params) => &params.model,
        }
    }
}

/// OpenAI chat completion parameters.
#[derive(Debug, Clone)]
pub struct GptParams {
    pub model: String,
    /// 1..=16384
    pub max_tokens: u32,
    /// 0.0..=2.0
    pub temperature: f32,
    /// 0.0..=1.0
    pub top_p: f32,
}

impl GptParams {
    pub const MAX_TOKENS_CEILING: u32 = 16384;
    pub const TEMPERATURE_CEILING: f32 = 2.0;

    pub fn new(
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
        top_p: f32,
    ) -> Result<Self> {
        if max_tokens < 1 || max_tokens > Self::MAX_TOKENS_CEILING {
            bail!("max_tokens must be between 1 and {}", Self::MAX_TOKENS_CEILING);
        }
        if !(0.0..=Self::TEMPERATURE_CEILING).contains(&temperature) {
            bail!("temperature must be between 0.0 and {}", Self::TEMPERATURE_CEILING);
        }
        check_top_p(top_p)?;
        Ok(GptParams {
            model: model.into(),
            max_tokens,
            temperature,
            top_p,
        })
    }
}

/// Anthropic messages parameters.
#[derive(Debug, Clone)]
pub struct ClaudeParams {
    pub model: String,
    /// 1..=8192
    pub max_tokens: u32,
    /// 0.0..=1.0
    pub temperature: f32,
    /// 0.0..=1.0
    pub top_p: f32,
}

impl ClaudeParams {
    pub const MAX_TOKENS_CEILING: u32 = 8192;
    pub const TEMPERATURE_CEILING: f32 = 1.0;

    pub fn new(
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
        top_p: f32,
    ) -> Result<Self> {
        if max_tokens < 1 || max_tokens > Self::MAX_TOKENS_CEILING {
            bail!("max_tokens must be between 1 and {}", Self::MAX_TOKENS_CEILING);
        }
        if !(0.0..=Self::TEMPERATURE_CEILING).contains(&temperature) {
            bail!("temperature must be between 0.0 and {}", Self::TEMPERATURE_CEILING);
        }
        check_top_p(top_p)?;
        Ok(ClaudeParams {
            model: model.into(),
            max_tokens,
            temperature,
            top_p,
        })
    }
}

/// top_p is 0.0..=1.0 for both providers.
fn check_top_p(top_p: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&top_p) {
        bail!("top_p must be between 0.0 and 1.0");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_max_tokens_bounds() {
        assert!(ClaudeParams::new("claude", 0, 0.5, 0.5).is_err());
        assert!(ClaudeParams::new("claude", 1, 0.5, 0.5).is_ok());
        assert!(ClaudeParams::new("claude", 8192, 0.5, 0.5).is_ok());
        assert!(ClaudeParams::new("claude", 8193, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_claude_temperature_bounds() {
        assert!(ClaudeParams::new("claude", 100, 0.0, 0.5).is_ok());
        assert!(ClaudeParams::new("claude", 100, 1.0, 0.5).is_ok());
        assert!(ClaudeParams::new("claude", 100, 1.01, 0.5).is_err());
        assert!(ClaudeParams::new("claude", 100, -0.1, 0.5).is_err());
    }

    #[test]
    fn test_gpt_max_tokens_bounds() {
        assert!(GptParams::new("gpt", 0, 0.5, 0.5).is_err());
        assert!(GptParams::new("gpt", 16384, 0.5, 0.5).is_ok());
        assert!(GptParams::new("gpt", 16385, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_gpt_temperature_bounds() {
        assert!(GptParams::new("gpt", 100, 2.0, 0.5).is_ok());
        assert!(GptParams::new("gpt", 100, 2.01, 0.5).is_err());
    }

    #[test]
    fn test_top_p_bounds_shared() {
        assert!(GptParams::new("gpt", 100, 0.5, 1.0).is_ok());
        assert!(GptParams::new("gpt", 100, 0.5, 1.01).is_err());
        assert!(ClaudeParams::new("claude", 100, 0.5, -0.01).is_err());
    }

    #[test]
    fn test_model_accessor() {
        let params = ModelParams::Claude(ClaudeParams::new("claude-x", 100, 0.5, 0.5).unwrap());
        assert_eq!(params.model(), "claude-x");
    }
}
