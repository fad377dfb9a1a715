//! LLM Provider trait definition.

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, ModelDefinition, ProviderCapabilities};
use crate::error::ProviderError;
use crate::types::Message;

/// Core trait for LLM providers.
///
/// Implementations perform exactly one network call per `complete` and never
/// retry; retry policy belongs to the caller.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Returns the available models.
    fn models(&self) -> &[ModelDefinition];

    /// Returns the provider capabilities.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Generate a completion.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Count tokens for a message (optional).
    async fn count_tokens(&self, messages: &[Message], model: &str) -> Result<u32, ProviderError> {
        let _ = model;
        // Default: rough estimate (4 chars per token)
        let text: String = messages.iter().map(|m| m.content.text()).collect();
        Ok((text.len() / 4) as u32)
    }
}
