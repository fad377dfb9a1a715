//! Response parsing utilities.

use variantsmith_protocols::provider::CompletionResponse;
use variantsmith_protocols::types::{Message, StopReason, Usage};

use crate::api::ApiResponse;

/// Parse API response to CompletionResponse. Only the first choice is used.
pub fn parse_response(response: ApiResponse) -> CompletionResponse {
    let choice = response.choices.into_iter().next();

    let (text, stop_reason) = match choice {
        Some(choice) => {
            let refused = choice.message.refusal.is_some() && choice.message.content.is_none();
            let stop_reason = if refused {
                StopReason::ContentFiltered
            } else {
                parse_finish_reason(choice.finish_reason.as_deref())
            };
            (choice.message.content.unwrap_or_default(), stop_reason)
        }
        None => (String::new(), StopReason::EndTurn),
    };

    let usage = match response.usage {
        Some(u) => {
            let mut usage = Usage::new(u.prompt_tokens, u.completion_tokens);
            if u.total_tokens > 0 {
                usage.total_tokens = u.total_tokens;
            }
            usage
        }
        None => Usage::default(),
    };

    CompletionResponse {
        id: response.id,
        model: response.model,
        message: Message::assistant(text),
        stop_reason,
        usage,
        metadata: Default::default(),
    }
}

/// Parse finish reason string.
pub fn parse_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFiltered,
        _ => StopReason::EndTurn,
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
