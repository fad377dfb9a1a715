use super::*;

#[test]
fn test_convert_messages_drops_system() {
    let messages = vec![
        Message::system("rules"),
        Message::user("Hello"),
        Message::assistant("Hi"),
    ];
    let converted = convert_messages(&messages);
    assert_eq!(converted.len(), 2);
    assert_eq!(converted[0].role, "user");
    assert_eq!(converted[1].role, "assistant");
}

#[test]
fn test_convert_system_merges_inline_system_messages() {
    let request = CompletionRequest::new(
        "claude-sonnet-4-20250514",
        vec![Message::system("Use only whitelisted selectors."), Message::user("Go")],
    )
    .with_system("You write A/B test code.");

    let system = convert_system(&request).unwrap();
    assert!(system.starts_with("You write A/B test code."));
    assert!(system.ends_with("Use only whitelisted selectors."));
}

#[test]
fn test_convert_system_none_when_absent() {
    let request = CompletionRequest::new("claude-sonnet-4-20250514", vec![Message::user("Go")]);
    assert!(convert_system(&request).is_none());
}

#[test]
fn test_convert_text_content() {
    let content = convert_content(&MessageContent::from_text("plain"));
    match content {
        ApiContent::Text(text) => assert_eq!(text, "plain"),
        _ => panic!("Expected text content"),
    }
}

#[test]
fn test_convert_image_content_to_base64_block() {
    let message = Message::user_with_images(
        "Before and after",
        vec![ImageSource::from_data_url("data:image/png;base64,AAAA")],
    );
    let json = serde_json::to_value(convert_content(&message.content)).unwrap();
    assert_eq!(json[0]["type"], "text");
    assert_eq!(json[1]["type"], "image");
    assert_eq!(json[1]["source"]["type"], "base64");
    assert_eq!(json[1]["source"]["media_type"], "image/png");
    assert_eq!(json[1]["source"]["data"], "AAAA");
}

#[test]
fn test_unsplit_data_url_becomes_base64() {
    let content = MessageContent::Parts(vec![ContentPart::Image {
        source: ImageSource::Url {
            url: "data:image/jpeg;base64,BBBB".to_string(),
        },
    }]);
    let json = serde_json::to_value(convert_content(&content)).unwrap();
    assert_eq!(json[0]["source"]["type"], "base64");
    assert_eq!(json[0]["source"]["media_type"], "image/jpeg");
}

#[test]
fn test_remote_url_stays_url() {
    let content = MessageContent::Parts(vec![ContentPart::Image {
        source: ImageSource::Url {
            url: "https://example.com/shot.png".to_string(),
        },
    }]);
    let json = serde_json::to_value(convert_content(&content)).unwrap();
    assert_eq!(json[0]["source"]["type"], "url");
    assert_eq!(json[0]["source"]["url"], "https://example.com/shot.png");
}
