//! OpenAI model definitions.

use variantsmith_protocols::provider::ModelDefinition;

/// Get all available OpenAI models.
pub fn get_models() -> Vec<ModelDefinition> {
    vec![
        ModelDefinition::new("gpt-4o", "GPT-4o")
            .with_context_length(128_000)
            .with_max_output_tokens(16_384)
            .with_vision(),
        ModelDefinition::new("gpt-4o-mini", "GPT-4o Mini")
            .with_context_length(128_000)
            .with_max_output_tokens(16_384)
            .with_vision(),
        ModelDefinition::new("gpt-4.1", "GPT-4.1")
            .with_context_length(1_047_576)
            .with_max_output_tokens(32_768)
            .with_vision(),
        ModelDefinition::new("gpt-4-turbo", "GPT-4 Turbo")
            .with_context_length(128_000)
            .with_max_output_tokens(4096)
            .with_vision(),
    ]
}
