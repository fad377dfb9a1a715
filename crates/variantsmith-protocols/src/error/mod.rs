//! Error types for the variantsmith protocol layer.

mod provider;
mod sandbox;
mod harness;
mod pipeline;

pub use provider::*;
pub use sandbox::*;
pub use harness::*;
pub use pipeline::*;
