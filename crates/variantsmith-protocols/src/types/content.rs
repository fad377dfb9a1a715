//! Message content types.

use serde::{Deserialize, Serialize};

/// Content of a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Get the text content of the message.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Images attached to this content, in order.
    pub fn images(&self) -> Vec<&ImageSource> {
        match self {
            MessageContent::Text(_) => Vec::new(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Image { source } => Some(source),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Create a text content.
    pub fn from_text(text: impl Into<String>) -> Self {
        MessageContent::Text(text.into())
    }
}

/// A part of a message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { source: ImageSource },
}

/// Image source for multimodal content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
    Url { url: String },
}

impl ImageSource {
    /// Interpret a screenshot string.
    ///
    /// `data:<media>;base64,<payload>` URLs are split into media type and
    /// payload; anything else is treated as a plain URL.
    pub fn from_data_url(value: &str) -> Self {
        if let Some(rest) = value.strip_prefix("data:") {
            if let Some((header, data)) = rest.split_once(',') {
                if let Some(media_type) = header.strip_suffix(";base64") {
                    return ImageSource::Base64 {
                        media_type: media_type.to_string(),
                        data: data.to_string(),
                    };
                }
            }
        }
        ImageSource::Url {
            url: value.to_string(),
        }
    }

    /// Render as a URL usable by providers that only accept URLs.
    pub fn to_url(&self) -> String {
        match self {
            ImageSource::Base64 { media_type, data } => format!("data:{};base64,{}", media_type, data),
            ImageSource::Url { url } => url.clone(),
        }
    }

    /// Approximate payload size in bytes.
    pub fn byte_len(&self) -> usize {
        match self {
            ImageSource::Base64 { media_type, data } => media_type.len() + data.len(),
            ImageSource::Url { url } => url.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_of_parts_skips_images() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text { text: "a".to_string() },
            ContentPart::Image {
                source: ImageSource::Url { url: "u".to_string() },
            },
            ContentPart::Text { text: "b".to_string() },
        ]);
        assert_eq!(content.text(), "a\nb");
    }

    #[test]
    fn test_from_data_url_base64() {
        let source = ImageSource::from_data_url("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(
            source,
            ImageSource::Base64 {
                media_type: "image/png".to_string(),
                data: "iVBORw0KGgo=".to_string(),
            }
        );
    }

    #[test]
    fn test_from_data_url_plain_url() {
        let source = ImageSource::from_data_url("https://cdn.example.com/shot.jpg");
        assert!(matches!(source, ImageSource::Url { .. }));
    }

    #[test]
    fn test_to_url_roundtrips_data_url() {
        let raw = "data:image/jpeg;base64,/9j/4AAQ";
        assert_eq!(ImageSource::from_data_url(raw).to_url(), raw);
    }

    #[test]
    fn test_image_part_serialization() {
        let part = ContentPart::Image {
            source: ImageSource::Base64 {
                media_type: "image/png".to_string(),
                data: "abc".to_string(),
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["source"]["type"], "base64");
        assert_eq!(json["source"]["media_type"], "image/png");
    }
}
