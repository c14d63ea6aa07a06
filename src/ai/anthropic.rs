//! Anthropic messages adapter
//!
//! Thin reqwest client for the messages endpoint. The system prompt rides
//! in the dedicated `system` field, and the history is closed with an empty
//! assistant turn so the model answers in place of the placeholder.

use log::{debug, error};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use super::{ChatMessage, ClaudeParams, ProviderResponse, PROVIDER_TIMEOUT};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client. Cheap to clone.
#[derive(Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    temperature: f32,
    top_p: f32,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        AnthropicClient {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Generate one Claude reply. Never returns an error past this boundary.
    pub async fn generate(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        params: &ClaudeParams,
    ) -> ProviderResponse {
        let request = MessagesRequest {
            model: &params.model,
            max_tokens: params.max_tokens,
            system: system_prompt,
            temperature: params.temperature,
            top_p: params.top_p,
            messages: build_messages(history),
        };
        debug!(
            "Sending {} messages to Anthropic (model: {})",
            request.messages.len(),
            params.model
        );

        let send = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send();

        let response = match timeout(PROVIDER_TIMEOUT, send).await {
            Err(_) => {
                error!(
                    "Anthropic request timed out after {}s",
                    PROVIDER_TIMEOUT.as_secs()
                );
                return ProviderResponse::ProviderError;
            }
            Ok(Err(err)) => {
                error!("Failed to reach the Anthropic API: {err}");
                return ProviderResponse::ProviderError;
            }
            Ok(Ok(response)) => response,
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Anthropic API returned {status}: {body}");
            return ProviderResponse::ProviderError;
        }

        match response.text().await {
            Ok(raw) => match extract_text(&raw) {
                Some(text) => ProviderResponse::Success(text),
                None => {
                    error!("Anthropic response had no readable text content: {raw}");
                    ProviderResponse::UnknownError
                }
            },
            Err(err) => {
                error!("Failed to read Anthropic response body: {err}");
                ProviderResponse::UnknownError
            }
        }
    }
}

/// History as wire messages, closed with the empty assistant placeholder.
fn build_messages(history: &[ChatMessage]) -> Vec<WireMessage> {
    let mut messages: Vec<WireMessage> = history
        .iter()
        .map(|turn| WireMessage {
            role: turn.role.as_str(),
            content: turn.content.clone(),
        })
        .collect();
    messages.push(WireMessage {
        role: "assistant",
        content: String::new(),
    });
    messages
}

/// First text block of a messages response body.
fn extract_text(raw: &str) -> Option<String> {
    let response: MessagesResponse = serde_json::from_str(raw).ok()?;
    response
        .content
        .into_iter()
        .map(|block| block.text)
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatRole;

    #[test]
    fn test_wire_messages_end_with_assistant_placeholder() {
        let history = vec![ChatMessage::user("question")];
        let messages = build_messages(&history);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].role, "assistant");
        assert!(messages[1].content.is_empty());
    }

    #[test]
    fn test_request_json_shape() {
        let request = MessagesRequest {
            model: "claude-test",
            max_tokens: 512,
            system: "be terse",
            temperature: 0.3,
            top_p: 0.9,
            messages: build_messages(&[ChatMessage {
                role: ChatRole::User,
                content: "hi".to_string(),
            }]),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "claude-test");
        assert_eq!(value["max_tokens"], 512);
        assert_eq!(value["system"], "be terse");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][1]["role"], "assistant");
    }

    #[test]
    fn test_extract_text_reads_first_text_block() {
        let raw = r#"{"id":"msg_1","content":[{"type":"text","text":"answer"}]}"#;
        assert_eq!(extract_text(raw), Some("answer".to_string()));
    }

    #[test]
    fn test_extract_text_skips_non_text_blocks() {
        let raw = r#"{"content":[{"type":"tool_use"},{"type":"text","text":"later"}]}"#;
        assert_eq!(extract_text(raw), Some("later".to_string()));
    }

    #[test]
    fn test_extract_text_rejects_malformed_body() {
        assert_eq!(extract_text("not json"), None);
        assert_eq!(extract_text(r#"{"content":[]}"#), None);
    }
}
