//! Response parsing utilities.

use variantsmith_protocols::provider::CompletionResponse;
use variantsmith_protocols::types::{Message, StopReason, Usage};

use crate::api::{ApiResponse, ContentBlock};

/// Parse API response to CompletionResponse.
pub fn parse_response(response: ApiResponse) -> CompletionResponse {
    let text = response
        .content
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("");

    CompletionResponse {
        id: response.id,
        model: response.model,
        message: Message::assistant(text),
        stop_reason: parse_stop_reason(response.stop_reason.as_deref()),
        usage: Usage::new(response.usage.input_tokens, response.usage.output_tokens),
        metadata: Default::default(),
    }
}

/// Parse stop reason string.
pub fn parse_stop_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("max_tokens") => StopReason::MaxTokens,
        Some("stop_sequence") => StopReason::StopSequence,
        Some("refusal") => StopReason::ContentFiltered,
        _ => StopReason::EndTurn,
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
