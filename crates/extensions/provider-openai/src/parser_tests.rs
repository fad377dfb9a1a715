use super::*;
use crate::api::{ApiUsage, Choice, ResponseMessage};

fn response_with(content: Option<&str>, finish_reason: &str) -> ApiResponse {
    ApiResponse {
        id: "chatcmpl-1".to_string(),
        model: "gpt-4o".to_string(),
        choices: vec![Choice {
            message: ResponseMessage {
                content: content.map(String::from),
                refusal: None,
            },
            finish_reason: Some(finish_reason.to_string()),
        }],
        usage: Some(ApiUsage {
            prompt_tokens: 100,
            completion_tokens: 20,
            total_tokens: 120,
        }),
    }
}

#[test]
fn test_parse_finish_reason() {
    assert_eq!(parse_finish_reason(Some("stop")), StopReason::EndTurn);
    assert_eq!(parse_finish_reason(Some("length")), StopReason::MaxTokens);
    assert_eq!(parse_finish_reason(Some("content_filter")), StopReason::ContentFiltered);
    assert_eq!(parse_finish_reason(None), StopReason::EndTurn);
}

#[test]
fn test_parse_response_text() {
    let parsed = parse_response(response_with(Some("{\"variations\":[]}"), "stop"));
    assert_eq!(parsed.text(), "{\"variations\":[]}");
    assert_eq!(parsed.usage.prompt_tokens, 100);
    assert_eq!(parsed.usage.completion_tokens, 20);
    assert_eq!(parsed.usage.total_tokens, 120);
}

#[test]
fn test_parse_response_null_content() {
    let parsed = parse_response(response_with(None, "length"));
    assert!(parsed.text().is_empty());
    assert_eq!(parsed.stop_reason, StopReason::MaxTokens);
}

#[test]
fn test_parse_response_refusal() {
    let mut response = response_with(None, "stop");
    response.choices[0].message.refusal = Some("I can't help with that.".to_string());
    let parsed = parse_response(response);
    assert_eq!(parsed.stop_reason, StopReason::ContentFiltered);
}

#[test]
fn test_parse_response_no_choices() {
    let mut response = response_with(Some("x"), "stop");
    response.choices.clear();
    response.usage = None;
    let parsed = parse_response(response);
    assert!(parsed.text().is_empty());
    assert_eq!(parsed.usage.total_tokens, 0);
}
