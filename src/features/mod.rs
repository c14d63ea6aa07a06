//! # Features Layer
//!
//! Domain features of the bot: command authorization, thread conversations,
//! and the daily usage reset.

pub mod conversation;
pub mod gate;
pub mod usage;

// Re-export feature items
pub use conversation::{
    ConversationStore, ThreadConversationHandler, ThreadSession, THREAD_PREFIX,
};
pub use gate::{Gate, GateContext, Guard};
pub use usage::UsageResetScheduler;
