//! Common types used across the variantsmith crates.

mod message;
mod content;
mod common;

pub use message::*;
pub use content::*;
pub use common::*;
