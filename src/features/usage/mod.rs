//! # Feature: Usage Reset
//!
//! The recurring task that zeroes daily usage counters at local midnight.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod scheduler;

pub use scheduler::UsageResetScheduler;
