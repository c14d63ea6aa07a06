//! OpenAI chat completion adapter
//!
//! The system prompt travels as an injected leading message; the history
//! follows in order. The `openai` crate reads its API key from the
//! environment, which the binary sets from config at startup.

use log::{debug, error};
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use tokio::time::timeout;

use super::{ChatMessage, ChatRole, GptParams, ProviderResponse, PROVIDER_TIMEOUT};

/// Generate one GPT completion. Never returns an error past this boundary.
pub async fn generate_gpt_response(
    system_prompt: &str,
    history: &[ChatMessage],
    params: &GptParams,
) -> ProviderResponse {
    let messages = build_messages(system_prompt, history);
    debug!(
        "Sending {} messages to OpenAI (model: {})",
        messages.len(),
        params.model
    );

    let request = ChatCompletion::builder(&params.model, messages)
        .max_tokens(params.max_tokens as u64)
        .temperature(params.temperature)
        .top_p(params.top_p)
        .create();

    let completion = match timeout(PROVIDER_TIMEOUT, request).await {
        Err(_) => {
            error!(
                "OpenAI request timed out after {}s",
                PROVIDER_TIMEOUT.as_secs()
            );
            return ProviderResponse::ProviderError;
        }
        Ok(Err(err)) => {
            error!("OpenAI API error: {err}");
            return ProviderResponse::ProviderError;
        }
        Ok(Ok(completion)) => completion,
    };

    match completion
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
    {
        Some(text) => ProviderResponse::Success(text.trim().to_string()),
        None => {
            error!("OpenAI returned a completion without content");
            ProviderResponse::UnknownError
        }
    }
}

fn build_messages(system_prompt: &str, history: &[ChatMessage]) -> Vec<ChatCompletionMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(plain_message(
        ChatCompletionMessageRole::System,
        system_prompt.to_string(),
    ));
    for turn in history {
        let role = match turn.role {
            ChatRole::User => ChatCompletionMessageRole::User,
            ChatRole::Assistant => ChatCompletionMessageRole::Assistant,
        };
        messages.push(plain_message(role, turn.content.clone()));
    }
    messages
}

fn plain_message(role: ChatCompletionMessageRole, content: String) -> ChatCompletionMessage {
    ChatCompletionMessage {
        role,
        content: Some(content),
        name: None,
        function_call: None,
        tool_call_id: None,
        tool_calls: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_leads_the_message_array() {
        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let messages = build_messages("be nice", &history);

        assert_eq!(messages.len(), 3);
        assert!(matches!(
            messages[0].role,
            ChatCompletionMessageRole::System
        ));
        assert_eq!(messages[0].content.as_deref(), Some("be nice"));
        assert!(matches!(messages[1].role, ChatCompletionMessageRole::User));
        assert!(matches!(
            messages[2].role,
            ChatCompletionMessageRole::Assistant
        ));
    }
}
