//! Canonical message to Anthropic wire format conversion.

use variantsmith_protocols::provider::CompletionRequest;
use variantsmith_protocols::types::{ContentPart, ImageSource, Message, MessageContent, MessageRole};

use crate::api::{ApiContent, ApiImageSource, ApiMessage, ContentBlock};

/// Convert messages to Anthropic API format. System messages are lifted
/// out by [`convert_system`].
pub fn convert_messages(messages: &[Message]) -> Vec<ApiMessage> {
    messages
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .map(|m| ApiMessage {
            role: match m.role {
                MessageRole::Assistant => "assistant".to_string(),
                MessageRole::User | MessageRole::System => "user".to_string(),
            },
            content: convert_content(&m.content),
        })
        .collect()
}

/// Top-level `system` field: the request's system prompt followed by any
/// inline system messages.
pub fn convert_system(request: &CompletionRequest) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(system) = &request.system {
        parts.push(system.clone());
    }
    parts.extend(
        request
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.text()),
    );
    let parts: Vec<String> = parts.into_iter().filter(|p| !p.trim().is_empty()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

/// Convert a single message's content.
pub fn convert_content(content: &MessageContent) -> ApiContent {
    match content {
        MessageContent::Text(text) => ApiContent::Text(text.clone()),
        MessageContent::Parts(parts) => ApiContent::Blocks(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => ContentBlock::Text { text: text.clone() },
                    ContentPart::Image { source } => ContentBlock::Image {
                        source: convert_image(source),
                    },
                })
                .collect(),
        ),
    }
}

fn convert_image(source: &ImageSource) -> ApiImageSource {
    match source {
        ImageSource::Base64 { media_type, data } => ApiImageSource::Base64 {
            media_type: media_type.clone(),
            data: data.clone(),
        },
        // A data URL that was never split still goes out as base64.
        ImageSource::Url { url } => match ImageSource::from_data_url(url) {
            ImageSource::Base64 { media_type, data } => ApiImageSource::Base64 { media_type, data },
            ImageSource::Url { url } => ApiImageSource::Url { url },
        },
    }
}

#[cfg(test)]
#[path = "converter_tests.rs"]
mod tests;
