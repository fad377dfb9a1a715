//! The individual parse strategies. Each one is total: it returns `None`
//! when its shape does not match and never panics.

use serde_json::{Map, Value};
use variantsmith_protocols::{GeneratedCode, Variation};

use super::json::{fenced_blocks, parse_from_first_brace, parse_strict};
use super::legacy;

pub(super) fn strict_json(text: &str) -> Option<GeneratedCode> {
    parse_strict(text).and_then(|v| code_from_value(&v))
}

/// First fenced block that is a JSON object with variations.
pub(super) fn fenced_json(text: &str) -> Option<GeneratedCode> {
    fenced_blocks(text)
        .iter()
        .filter_map(|block| parse_strict(&block.body))
        .find_map(|v| code_from_value(&v))
}

pub(super) fn embedded_json(text: &str) -> Option<GeneratedCode> {
    parse_from_first_brace(text).and_then(|v| code_from_value(&v))
}

/// Separate `css`/`js` fences folded into one synthetic variation.
///
/// Declines text that carries variation headers, whose fences belong to
/// individual marker sections.
pub(super) fn fenced_code(text: &str) -> Option<GeneratedCode> {
    if legacy::has_variation_headers(text) {
        return None;
    }
    let mut css = Vec::new();
    let mut js = Vec::new();
    for block in fenced_blocks(text) {
        let body = block.body.trim();
        if body.is_empty() {
            continue;
        }
        match block.lang.as_str() {
            "css" | "scss" => css.push(body.to_string()),
            "js" | "javascript" => js.push(body.to_string()),
            _ => {}
        }
    }
    if css.is_empty() && js.is_empty() {
        return None;
    }
    let variation = Variation::new(1, "Variation 1")
        .with_css(css.join("\n\n"))
        .with_js(js.join("\n\n"));
    Some(GeneratedCode::new(vec![variation]))
}

/// Lenient conversion of a decoded object into [`GeneratedCode`].
///
/// Requires a non-empty `variations` array; tolerates the key spellings
/// models commonly drift into.
pub(crate) fn code_from_value(value: &Value) -> Option<GeneratedCode> {
    let object = value.as_object()?;
    let variations = object.get("variations")?.as_array()?;
    if variations.is_empty() {
        return None;
    }

    let variations = variations
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| variation_from_value(idx, item))
        .collect::<Vec<_>>();
    if variations.is_empty() {
        return None;
    }

    Some(GeneratedCode {
        variations,
        global_css: string_field(object, &["globalCSS", "globalCss", "global_css"]),
        global_js: string_field(object, &["globalJS", "globalJs", "global_js"]),
    })
}

fn variation_from_value(idx: usize, item: &Value) -> Option<Variation> {
    let object = item.as_object()?;
    let fallback = idx as u32 + 1;
    let number = match object.get("number") {
        Some(Value::Number(n)) => n.as_u64().map(|n| n as u32).unwrap_or(fallback),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(fallback),
        _ => fallback,
    };
    let mut name = string_field(object, &["name", "title"]);
    if name.trim().is_empty() {
        name = format!("Variation {}", number);
    }
    Some(Variation {
        number,
        name,
        css: string_field(object, &["css", "CSS"]),
        js: string_field(object, &["js", "JS", "javascript"]),
    })
}

fn string_field(object: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}
