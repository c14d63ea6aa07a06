// Core layer - configuration, prompts, message utilities
pub mod core;

// AI layer - model parameters, chat history, provider adapters
pub mod ai;

// Features layer - policy gate, conversations, usage scheduling
pub mod features;

// Infrastructure - persistence
pub mod database;

// Application layer
pub mod commands;
pub mod message_components;

// Re-export core config for convenience
pub use crate::core::Config;

// Re-export feature items used by the binary
pub use features::{
    // Policy gate
    Gate, GateContext, Guard,
    // Conversations
    ConversationStore, ThreadConversationHandler, ThreadSession, THREAD_PREFIX,
    // Usage reset
    UsageResetScheduler,
};

// Re-export persistence handle
pub use database::Database;
