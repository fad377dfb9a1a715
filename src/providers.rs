//! Provider construction for the pipeline gateway.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use variantsmith_pipeline::ProviderFactory;
use variantsmith_protocols::{LLMProvider, ProviderError, ProviderKind, ProviderSettings};
use variantsmith_provider_anthropic::AnthropicProvider;
use variantsmith_provider_openai::OpenAIProvider;

/// Builds one provider client per (provider, endpoint, key) and reuses it.
#[derive(Default)]
pub(crate) struct DefaultProviderFactory {
    clients: DashMap<String, Arc<dyn LLMProvider>>,
}

impl DefaultProviderFactory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn cache_key(settings: &ProviderSettings) -> String {
        format!(
            "{}|{}|{}",
            settings.provider.id(),
            settings.base_url.as_deref().unwrap_or_default(),
            settings.api_key
        )
    }
}

impl ProviderFactory for DefaultProviderFactory {
    fn create(&self, settings: &ProviderSettings) -> Result<Arc<dyn LLMProvider>, ProviderError> {
        if settings.api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationFailed(format!(
                "no API key for {}",
                settings.provider.display_name()
            )));
        }

        let key = Self::cache_key(settings);
        if let Some(client) = self.clients.get(&key) {
            return Ok(client.clone());
        }

        let client: Arc<dyn LLMProvider> = match settings.provider {
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::from_settings(settings)),
            ProviderKind::OpenAI => Arc::new(OpenAIProvider::from_settings(settings)),
        };
        info!("Created {} client", settings.provider.display_name());
        self.clients.insert(key, client.clone());
        Ok(client)
    }
}
