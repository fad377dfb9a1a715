//! Prompt Builder.
//!
//! Prompts are a pure function of their inputs: the same request always
//! yields byte-identical text.

mod builder;
mod compact;
mod templates;
mod whitelist;

pub use builder::PromptBuilder;
pub use compact::{CompactElement, scoped_elements, truncate_text};
pub use templates::{OUTPUT_FORMAT, SYSTEM_PROMPT};
pub use whitelist::build_whitelist;

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
