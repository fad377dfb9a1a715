//! Anthropic LLM provider for Variantsmith.

mod api;
mod converter;
mod models;
mod parser;
mod provider;

pub use provider::AnthropicProvider;
