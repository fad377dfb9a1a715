//! Shared fakes for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use variantsmith_protocols::{
    CompletionRequest, CompletionResponse, ElementDatabase, ElementRecord, LLMProvider, Message,
    ModelDefinition, ProviderCapabilities, ProviderError, ProviderKind, ProviderSettings,
    StopReason, Usage,
};

use crate::gateway::{ProviderFactory, ProviderGateway};

/// Replies with queued texts in order; records every request.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
    capabilities: ProviderCapabilities,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
            capabilities: ProviderCapabilities::default(),
        })
    }

    /// Text of the first user message of the most recent request.
    pub fn last_prompt(&self) -> String {
        self.requests
            .lock()
            .last()
            .and_then(|r| r.messages.first())
            .map(|m| m.content.text())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    fn models(&self) -> &[ModelDefinition] {
        &[]
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().push(request);
        let text = self.replies.lock().pop_front().unwrap_or_default();
        Ok(CompletionResponse {
            id: "scripted".to_string(),
            model,
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: Usage::new(100, 50),
            metadata: Default::default(),
        })
    }
}

pub(crate) struct StaticFactory(pub Arc<ScriptedProvider>);

impl ProviderFactory for StaticFactory {
    fn create(&self, _settings: &ProviderSettings) -> Result<Arc<dyn LLMProvider>, ProviderError> {
        Ok(self.0.clone())
    }
}

pub(crate) fn gateway(provider: &Arc<ScriptedProvider>) -> ProviderGateway {
    ProviderGateway::new(Arc::new(StaticFactory(provider.clone())), 4_500_000)
}

pub(crate) fn settings() -> ProviderSettings {
    ProviderSettings::new(ProviderKind::OpenAI, "gpt-test", "sk-test")
}

pub(crate) fn database() -> ElementDatabase {
    ElementDatabase::from_elements(
        "https://example.com",
        vec![
            ElementRecord::new("#cta", "button").with_text("Get Started"),
            ElementRecord::new("#hero-h1", "h1").with_text("Welcome"),
            ElementRecord::new("nav a", "a"),
        ],
    )
}
