//! Anthropic model definitions.

use variantsmith_protocols::provider::ModelDefinition;

/// Get all available Anthropic models.
pub fn get_models() -> Vec<ModelDefinition> {
    vec![
        ModelDefinition::new("claude-opus-4-20250514", "Claude Opus 4")
            .with_context_length(200_000)
            .with_max_output_tokens(32_000)
            .with_vision(),
        ModelDefinition::new("claude-sonnet-4-20250514", "Claude Sonnet 4")
            .with_context_length(200_000)
            .with_max_output_tokens(64_000)
            .with_vision(),
        ModelDefinition::new("claude-3-7-sonnet-20250219", "Claude Sonnet 3.7")
            .with_context_length(200_000)
            .with_max_output_tokens(64_000)
            .with_vision(),
        ModelDefinition::new("claude-3-5-haiku-20241022", "Claude Haiku 3.5")
            .with_context_length(200_000)
            .with_max_output_tokens(8192)
            .with_vision(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_models_returns_four_models() {
        assert_eq!(get_models().len(), 4);
    }

    #[test]
    fn test_default_model_is_listed() {
        let models = get_models();
        assert!(models.iter().any(|m| m.id == "claude-sonnet-4-20250514"));
    }

    #[test]
    fn test_all_models_support_vision() {
        for model in get_models() {
            assert!(model.supports_vision, "{} should support vision", model.id);
            assert_eq!(model.context_length, 200_000);
        }
    }
}
