//! # Core Module
//!
//! Configuration, system prompts, and message chunking for the aria bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod config;
pub mod prompts;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use prompts::SystemPrompts;
pub use response::{chunk_message, truncate_message, MESSAGE_LIMIT};
