//! Message types for model conversations.

use serde::{Deserialize, Serialize};

use super::content::{ContentPart, ImageSource, MessageContent};

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender.
    pub role: MessageRole,

    /// Content of the message.
    pub content: MessageContent,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a user message carrying text followed by images.
    pub fn user_with_images(text: impl Into<String>, images: Vec<ImageSource>) -> Self {
        if images.is_empty() {
            return Self::user(text);
        }
        let mut parts = vec![ContentPart::Text { text: text.into() }];
        parts.extend(images.into_iter().map(|source| ContentPart::Image { source }));
        Self {
            role: MessageRole::User,
            content: MessageContent::Parts(parts),
        }
    }
}

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content.text(), "Hello");
    }

    #[test]
    fn test_system_message() {
        let msg = Message::system("Rules");
        assert_eq!(msg.role, MessageRole::System);
    }

    #[test]
    fn test_user_with_images_builds_parts() {
        let msg = Message::user_with_images(
            "Compare",
            vec![ImageSource::Url { url: "https://example.com/a.png".to_string() }],
        );
        match &msg.content {
            MessageContent::Parts(parts) => assert_eq!(parts.len(), 2),
            _ => panic!("Expected parts"),
        }
        assert_eq!(msg.content.images().len(), 1);
    }

    #[test]
    fn test_user_with_no_images_stays_text() {
        let msg = Message::user_with_images("Plain", vec![]);
        assert!(matches!(msg.content, MessageContent::Text(_)));
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
