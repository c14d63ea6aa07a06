//! # Feature: Thread Conversations
//!
//! Multi-turn AI conversations scoped to bot-created threads. The store
//! keeps each thread's system prompt and model parameters for the life of
//! the process; the continuation handler replays bounded history on every
//! follow-up message.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod continuation;

pub use continuation::ThreadConversationHandler;

use dashmap::DashMap;
use std::sync::Arc;

use crate::ai::ModelParams;

/// Name prefix that marks a thread as one of our conversations.
pub const THREAD_PREFIX: &str = ">>>";

/// Parameters fixed at conversation start and reused for every turn.
#[derive(Debug, Clone)]
pub struct ThreadSession {
    pub system_prompt: String,
    pub params: ModelParams,
}

/// Thread id → session map shared across tasks.
///
/// Entries are written once per thread and never evicted; thread ids are
/// unique per conversation, so growth is bounded by real usage.
#[derive(Clone, Default)]
pub struct ConversationStore {
    sessions: Arc<DashMap<u64, ThreadSession>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, thread_id: u64, session: ThreadSession) {
        self.sessions.insert(thread_id, session);
    }

    pub fn get(&self, thread_id: u64) -> Option<ThreadSession> {
        self.sessions.get(&thread_id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ai::ClaudeParams;

    fn session(prompt: &str) -> ThreadSession {
        ThreadSession {
            system_prompt: prompt.to_string(),
            params: ModelParams::Claude(ClaudeParams::new("claude-test", 512, 0.5, 0.9).unwrap()),
        }
    }

    #[test]
    fn test_insert_then_get() {
        let store = ConversationStore::new();
        store.insert(42, session("be kind"));

        let found = store.get(42).unwrap();
        assert_eq!(found.system_prompt, "be kind");
        assert_eq!(found.params.model(), "claude-test");
    }

    #[test]
    fn test_missing_thread_returns_none() {
        let store = ConversationStore::new();
        assert!(store.get(42).is_none());
    }

    #[test]
    fn test_reinsert_overwrites() {
        let store = ConversationStore::new();
        store.insert(42, session("first"));
        store.insert(42, session("second"));
        assert_eq!(store.get(42).unwrap().system_prompt, "second");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let store = ConversationStore::new();
        let other = store.clone();
        store.insert(1, session("shared"));
        assert!(other.get(1).is_some());
    }
}
