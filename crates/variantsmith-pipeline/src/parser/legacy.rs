//! Line-oriented recovery of marker-delimited sections:
//!
//! ```text
//! GLOBAL EXPERIENCE CSS
//! VARIATION 1 - Bold CTA
//! CSS:
//! ...
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use variantsmith_protocols::{CodeKind, GeneratedCode, Variation};

static VARIATION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\s#=*]*VARIATION\s*#?(\d+)\s*(?:[-–—:.)]\s*)?(.*?)[\s=*:]*$")
        .expect("valid regex")
});

static GLOBAL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\s#=*]*GLOBAL(?:\s+EXPERIENCE)?\s+(CSS|JS|JAVASCRIPT)(?:\s+CODE)?[\s=*:]*$")
        .expect("valid regex")
});

static KIND_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\s#=*]*(CSS|JS|JAVASCRIPT)(?:\s+CODE)?[\s=*:]*$").expect("valid regex")
});

static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*```\s*([A-Za-z]*)\s*$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Global,
    Variation(usize),
}

struct Accumulator {
    global_css: Vec<String>,
    global_js: Vec<String>,
    variations: Vec<(u32, String, Vec<String>, Vec<String>)>,
}

impl Accumulator {
    fn buffer(&mut self, section: Section, kind: CodeKind) -> Option<&mut Vec<String>> {
        match (section, kind) {
            (Section::Preamble, _) => None,
            (Section::Global, CodeKind::Css) => Some(&mut self.global_css),
            (Section::Global, CodeKind::Js) => Some(&mut self.global_js),
            (Section::Variation(idx), CodeKind::Css) => self.variations.get_mut(idx).map(|v| &mut v.2),
            (Section::Variation(idx), CodeKind::Js) => self.variations.get_mut(idx).map(|v| &mut v.3),
        }
    }
}

fn kind_from_label(label: &str) -> CodeKind {
    if label.eq_ignore_ascii_case("css") {
        CodeKind::Css
    } else {
        CodeKind::Js
    }
}

fn finish(lines: &[String]) -> String {
    lines.join("\n").trim().to_string()
}

pub(super) fn has_variation_headers(text: &str) -> bool {
    text.lines().any(|line| VARIATION_HEADER.is_match(line))
}

pub(super) fn markers(text: &str) -> Option<GeneratedCode> {
    let mut acc = Accumulator {
        global_css: Vec::new(),
        global_js: Vec::new(),
        variations: Vec::new(),
    };
    let mut section = Section::Preamble;
    let mut kind = CodeKind::Css;

    for line in text.lines() {
        if let Some(caps) = GLOBAL_HEADER.captures(line) {
            section = Section::Global;
            kind = kind_from_label(&caps[1]);
            continue;
        }
        if let Some(caps) = VARIATION_HEADER.captures(line) {
            let number = caps[1].parse().unwrap_or(acc.variations.len() as u32 + 1);
            let name = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            let name = if name.is_empty() {
                format!("Variation {}", number)
            } else {
                name.to_string()
            };
            acc.variations.push((number, name, Vec::new(), Vec::new()));
            section = Section::Variation(acc.variations.len() - 1);
            kind = CodeKind::Css;
            continue;
        }
        if let Some(caps) = KIND_HEADER.captures(line) {
            kind = kind_from_label(&caps[1]);
            continue;
        }
        if let Some(caps) = FENCE.captures(line) {
            match caps[1].to_ascii_lowercase().as_str() {
                "css" | "scss" => kind = CodeKind::Css,
                "js" | "javascript" => kind = CodeKind::Js,
                _ => {}
            }
            continue;
        }
        if let Some(buffer) = acc.buffer(section, kind) {
            buffer.push(line.to_string());
        }
    }

    if acc.variations.is_empty() {
        return None;
    }

    let variations = acc
        .variations
        .iter()
        .map(|(number, name, css, js)| Variation {
            number: *number,
            name: name.clone(),
            css: finish(css),
            js: finish(js),
        })
        .collect();

    Some(GeneratedCode {
        variations,
        global_css: finish(&acc.global_css),
        global_js: finish(&acc.global_js),
    })
}
