//! Iterative Adjustment Engine.
//!
//! Code already applied to the page is context for the next turn, never
//! something to be replaced: each turn's output is the existing code plus
//! the requested changes.

mod engine;
mod log;
mod merge;

pub use engine::AdjustmentEngine;
pub use log::ConversationLog;
pub use merge::{MergeViolation, check_additive, enforce_additive};
