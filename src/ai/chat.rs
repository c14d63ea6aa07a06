//! Normalized chat history
//!
//! Thread messages arrive newest-first from the platform and include the
//! bot's own replies. Normalization inverts the bot's messages into
//! assistant turns (the model should see its prior replies), drops anything
//! without usable text, and restores chronological order.

/// Role of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Wire name shared by both providers.
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One normalized conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Normalize raw `(authored_by_bot, content)` entries, newest first, into
/// chronological [`ChatMessage`]s.
pub fn normalize_history<I>(newest_first: I) -> Vec<ChatMessage>
where
    I: IntoIterator<Item = (bool, String)>,
{
    let mut history: Vec<ChatMessage> = newest_first
        .into_iter()
        .filter(|(_, content)| !content.trim().is_empty())
        .map(|(authored_by_bot, content)| {
            if authored_by_bot {
                ChatMessage::assistant(content)
            } else {
                ChatMessage::user(content)
            }
        })
        .collect();
    history.reverse();
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restores_chronological_order() {
        let history = normalize_history(vec![
            (false, "third".to_string()),
            (true, "second".to_string()),
            (false, "first".to_string()),
        ]);
        assert_eq!(
            history,
            vec![
                ChatMessage::user("first"),
                ChatMessage::assistant("second"),
                ChatMessage::user("third"),
            ]
        );
    }

    #[test]
    fn test_bot_messages_become_assistant_turns() {
        let history = normalize_history(vec![(true, "reply".to_string())]);
        assert_eq!(history[0].role, ChatRole::Assistant);
    }

    #[test]
    fn test_empty_and_whitespace_messages_dropped() {
        let history = normalize_history(vec![
            (false, "keep".to_string()),
            (false, "   ".to_string()),
            (true, String::new()),
        ]);
        assert_eq!(history, vec![ChatMessage::user("keep")]);
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(ChatRole::User.as_str(), "user");
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
    }
}
