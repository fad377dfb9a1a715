//! JSON recovery shared by the response parser and the Visual QA evaluator.
//!
//! Three primitives, tried in this order by [`extract_json_where`]:
//! the whole text as one object, each fenced block in document order, and
//! the text from the first `{` onwards.

use serde_json::Value;

/// A fenced (```lang) block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Lowercased info string; empty when the fence had none.
    pub lang: String,
    pub body: String,
}

/// Every fenced block in document order.
///
/// An unterminated final block runs to the end of the text.
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        match current.take() {
            None => {
                if let Some(info) = trimmed.strip_prefix("```") {
                    let lang = info
                        .split_whitespace()
                        .next()
                        .unwrap_or("")
                        .to_ascii_lowercase();
                    current = Some((lang, Vec::new()));
                }
            }
            Some((lang, mut lines)) => {
                if trimmed.starts_with("```") {
                    blocks.push(FencedBlock {
                        lang,
                        body: lines.join("\n"),
                    });
                } else {
                    lines.push(line);
                    current = Some((lang, lines));
                }
            }
        }
    }

    if let Some((lang, lines)) = current {
        if !lines.is_empty() {
            blocks.push(FencedBlock {
                lang,
                body: lines.join("\n"),
            });
        }
    }
    blocks
}

/// The trimmed text parsed as exactly one JSON object.
pub fn parse_strict(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') || !trimmed.ends_with('}') {
        return None;
    }
    serde_json::from_str::<Value>(trimmed)
        .ok()
        .filter(Value::is_object)
}

/// The first JSON object starting at the first `{`, ignoring anything after it.
pub fn parse_from_first_brace(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) if value.is_object() => Some(value),
        _ => None,
    }
}

/// Run the recovery cascade and return the first object accepted by `accept`.
pub fn extract_json_where<F>(text: &str, accept: F) -> Option<Value>
where
    F: Fn(&Value) -> bool,
{
    if let Some(value) = parse_strict(text).filter(|v| accept(v)) {
        return Some(value);
    }
    if let Some(value) = fenced_blocks(text)
        .iter()
        .filter_map(|block| parse_strict(&block.body))
        .find(|v| accept(v))
    {
        return Some(value);
    }
    parse_from_first_brace(text).filter(|v| accept(v))
}
