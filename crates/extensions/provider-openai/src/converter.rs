//! Message conversion for OpenAI API.

use variantsmith_protocols::provider::CompletionRequest;
use variantsmith_protocols::types::{ContentPart as ProtoContentPart, Message, MessageContent, MessageRole};

use crate::api::{ApiMessage, ContentPart, ImageUrl, MessageContent as ApiMessageContent};

/// Convert a request's system prompt and messages to OpenAI API format.
/// The system prompt stays inline as the first message.
pub fn convert_request_messages(request: &CompletionRequest) -> Vec<ApiMessage> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = request.system.as_ref().filter(|s| !s.trim().is_empty()) {
        messages.push(ApiMessage {
            role: "system".to_string(),
            content: ApiMessageContent::Text(system.clone()),
        });
    }
    messages.extend(convert_messages(&request.messages));
    messages
}

/// Convert protocol messages to OpenAI API format.
pub fn convert_messages(messages: &[Message]) -> Vec<ApiMessage> {
    messages.iter().map(convert_message).collect()
}

fn convert_message(msg: &Message) -> ApiMessage {
    let role = match msg.role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    };

    let content = match &msg.content {
        MessageContent::Text(text) => ApiMessageContent::Text(text.clone()),
        MessageContent::Parts(parts) => ApiMessageContent::Parts(convert_parts(parts)),
    };

    ApiMessage {
        role: role.to_string(),
        content,
    }
}

fn convert_parts(parts: &[ProtoContentPart]) -> Vec<ContentPart> {
    parts
        .iter()
        .map(|part| match part {
            ProtoContentPart::Text { text } => ContentPart::Text { text: text.clone() },
            ProtoContentPart::Image { source } => ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: source.to_url(),
                    detail: None,
                },
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use variantsmith_protocols::types::ImageSource;

    #[test]
    fn test_system_prompt_is_first_message() {
        let request = CompletionRequest::new("gpt-4o", vec![Message::user("Hello")])
            .with_system("You write A/B test code.");
        let messages = convert_request_messages(&request);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_blank_system_prompt_is_skipped() {
        let request = CompletionRequest::new("gpt-4o", vec![Message::user("Hello")]).with_system("  ");
        assert_eq!(convert_request_messages(&request).len(), 1);
    }

    #[test]
    fn test_inline_system_message_kept() {
        let messages = convert_messages(&[Message::system("rules"), Message::assistant("ok")]);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "assistant");
    }

    #[test]
    fn test_image_becomes_data_url() {
        let message = Message::user_with_images(
            "Compare",
            vec![ImageSource::Base64 {
                media_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            }],
        );
        let json = serde_json::to_value(convert_messages(&[message])).unwrap();
        assert_eq!(json[0]["content"][0]["type"], "text");
        assert_eq!(json[0]["content"][1]["type"], "image_url");
        assert_eq!(json[0]["content"][1]["image_url"]["url"], "data:image/png;base64,AAAA");
    }
}
