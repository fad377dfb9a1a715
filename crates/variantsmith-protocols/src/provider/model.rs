//! Model definition types.

use serde::{Deserialize, Serialize};

/// Definition of an LLM model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Model identifier.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Maximum context length in tokens.
    pub context_length: u32,

    /// Maximum output tokens.
    pub max_output_tokens: u32,

    /// Whether the model supports vision/images.
    #[serde(default)]
    pub supports_vision: bool,
}

impl ModelDefinition {
    /// Create a new model definition.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            context_length: 128_000,
            max_output_tokens: 4096,
            supports_vision: false,
        }
    }

    /// Set context length.
    pub fn with_context_length(mut self, length: u32) -> Self {
        self.context_length = length;
        self
    }

    /// Set maximum output tokens.
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Enable vision support.
    pub fn with_vision(mut self) -> Self {
        self.supports_vision = true;
        self
    }
}

/// Provider capabilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// Supports vision/image inputs.
    pub vision: bool,

    /// Supports a dedicated JSON output mode.
    pub json_mode: bool,

    /// Accepts the system prompt as a separate top-level field.
    pub separate_system: bool,

    /// Maximum concurrent requests.
    pub max_concurrent: Option<u32>,
}
