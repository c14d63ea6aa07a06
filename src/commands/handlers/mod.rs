//! Slash command handlers, one module per command family.

pub mod access;
pub mod channels;
pub mod chat;
pub mod fixpy;
pub mod limits;
pub mod talk;
