use super::*;

#[test]
fn test_stop_reason_serialization() {
    let json = serde_json::to_string(&StopReason::EndTurn).unwrap();
    assert_eq!(json, "\"end_turn\"");

    let json = serde_json::to_string(&StopReason::ContentFiltered).unwrap();
    assert_eq!(json, "\"content_filtered\"");
}

#[test]
fn test_stop_reason_deserialization() {
    let reason: StopReason = serde_json::from_str("\"max_tokens\"").unwrap();
    assert_eq!(reason, StopReason::MaxTokens);
}

#[test]
fn test_usage_default() {
    let usage = Usage::default();
    assert_eq!(usage.prompt_tokens, 0);
    assert_eq!(usage.completion_tokens, 0);
    assert_eq!(usage.total_tokens, 0);
}

#[test]
fn test_usage_new_derives_total() {
    let usage = Usage::new(120, 30);
    assert_eq!(usage.total_tokens, 150);
}

#[test]
fn test_usage_add() {
    let mut usage = Usage::new(10, 5);
    usage.add(&Usage::new(1, 2));
    assert_eq!(usage, Usage::new(11, 7));
}

#[test]
fn test_usage_serialization_camel_case() {
    let json = serde_json::to_value(Usage::new(3, 4)).unwrap();
    assert_eq!(json["promptTokens"], 3);
    assert_eq!(json["completionTokens"], 4);
    assert_eq!(json["totalTokens"], 7);
}
