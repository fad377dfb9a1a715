use super::*;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(config.providers.is_empty());
    assert_eq!(config.generation.provider, "anthropic");
    assert_eq!(config.generation.max_tokens, 4096);
    assert_eq!(config.generation.text_limit, 80);
    assert!(config.adjustment.enforce_additive);
}

#[test]
fn test_runtime_defaults() {
    let config = Config::default();
    assert_eq!(config.gateway.max_request_bytes, 4_500_000);
    assert_eq!(config.harness.default_timeout_ms, 10_000);
    assert_eq!(config.harness.max_timeout_ms, 20_000);
    assert_eq!(config.harness.max_retries, 2);
    assert!((config.harness.backoff_multiplier - 1.5).abs() < f64::EPSILON);
    assert_eq!(config.page.operation_timeout_ms, 15_000);
    assert_eq!(config.cache.capacity, 8);
    assert_eq!(config.cache.ttl_seconds, 300);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file_dir.is_none());
}

#[test]
fn test_partial_section_keeps_defaults() {
    let config: Config = toml::from_str(
        r#"
        [harness]
        max_retries = 1
        "#,
    )
    .unwrap();
    assert_eq!(config.harness.max_retries, 1);
    assert_eq!(config.harness.default_timeout_ms, 10_000);
}

#[test]
fn test_stage_sections_optional_fields() {
    let config: Config = toml::from_str(
        r#"
        [adjustment]
        provider = "openai"
        max_history_turns = 4

        [visual_qa]
        model = "gpt-4o-mini"
        "#,
    )
    .unwrap();
    assert_eq!(config.adjustment.provider.as_deref(), Some("openai"));
    assert!(config.adjustment.model.is_none());
    assert_eq!(config.adjustment.max_history_turns, 4);
    assert_eq!(config.visual_qa.model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(config.visual_qa.max_tokens, 1500);
}

#[test]
fn test_config_serialization_roundtrip() {
    let config = Config::default();
    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.cache.capacity, config.cache.capacity);
}
