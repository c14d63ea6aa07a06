//! System prompt loading
//!
//! Prompts live in a YAML file next to the binary (`prompts.yaml` by
//! default) so they can be edited without a rebuild.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// System prompts for each AI-facing command surface.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemPrompts {
    /// Single-turn `/chat` persona.
    pub chat: String,
    /// Thread-conversation persona used by `/talk` and follow-up messages.
    pub talk: String,
    /// Code-review persona used by `/fixpy`.
    pub fixpy: String,
}

impl SystemPrompts {
    /// Load prompts from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prompts file {}", path.display()))?;
        Self::from_yaml(&raw)
    }

    fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("failed to parse prompts file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml() {
        let prompts = SystemPrompts::from_yaml(
            "chat: be helpful\ntalk: be conversational\nfixpy: review python code\n",
        )
        .unwrap();
        assert_eq!(prompts.chat, "be helpful");
        assert_eq!(prompts.talk, "be conversational");
        assert_eq!(prompts.fixpy, "review python code");
    }

    #[test]
    fn test_from_yaml_missing_key_fails() {
        assert!(SystemPrompts::from_yaml("chat: only one\n").is_err());
    }
}
