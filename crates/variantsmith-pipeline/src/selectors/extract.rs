//! Heuristic selector extraction.
//!
//! Callers only depend on [`extract_selectors`] and [`referenced_selectors`];
//! a structural CSS/JS parser can replace the scanning below without
//! touching them.

use once_cell::sync::Lazy;
use regex::Regex;
use variantsmith_protocols::CodeKind;

static WAIT_FOR_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"waitForElement\s*\(\s*(?:'([^']*)'|"([^"]*)"|`([^`$]*)`)"#).expect("valid regex")
});

static DOM_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:waitForElement|querySelectorAll|querySelector|closest|matches|simulateClick|simulateHover|isVisible|exists)\s*\(\s*(?:'([^']*)'|"([^"]*)"|`([^`$]*)`)"#,
    )
    .expect("valid regex")
});

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

static DYNAMIC_PSEUDO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"::[A-Za-z-]+(?:\([^)]*\))?|:(?:hover|focus-within|focus-visible|focus|active|visited|link|checked|disabled|enabled|target|placeholder-shown|invalid|valid|before|after|first-line|first-letter)",
    )
    .expect("valid regex")
});

/// At-rules whose bodies hold ordinary style rules.
const GROUPING_AT_RULES: &[&str] = &["media", "supports", "container", "layer", "document"];

/// One top-level `prelude { body }` block of a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CssBlock<'a> {
    pub prelude: &'a str,
    pub body: &'a str,
    /// The whole block, prelude through closing brace.
    pub text: &'a str,
}

impl CssBlock<'_> {
    /// Name of the at-rule, lowercased, when the prelude starts with `@`.
    pub fn at_rule(&self) -> Option<String> {
        let rest = self.prelude.strip_prefix('@')?;
        let name: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        Some(name.to_ascii_lowercase())
    }

    /// Whether the body contains nested style rules.
    pub fn is_grouping(&self) -> bool {
        self.at_rule()
            .is_some_and(|name| GROUPING_AT_RULES.contains(&name.as_str()))
    }

    /// Comma-separated selectors of a style rule.
    pub fn selectors(&self) -> Vec<&str> {
        if self.prelude.starts_with('@') {
            return Vec::new();
        }
        split_top_level(self.prelude, ',')
    }
}

/// Blank out comments while keeping byte offsets stable.
pub(crate) fn blank_comments(css: &str) -> String {
    COMMENT
        .replace_all(css, |caps: &regex::Captures<'_>| " ".repeat(caps[0].len()))
        .into_owned()
}

/// Top-level blocks of `css`, which must already have comments blanked.
pub(crate) fn css_blocks(css: &str) -> Vec<CssBlock<'_>> {
    let bytes = css.as_bytes();
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut prelude_start = 0usize;
    let mut body_start = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'{' => {
                if depth == 0 {
                    body_start = i + 1;
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let raw_prelude = &css[prelude_start..body_start - 1];
                    let leading = raw_prelude.len() - raw_prelude.trim_start().len();
                    let text_start = prelude_start + leading;
                    blocks.push(CssBlock {
                        prelude: raw_prelude.trim(),
                        body: &css[body_start..i],
                        text: &css[text_start..=i],
                    });
                    prelude_start = i + 1;
                }
            }
            b';' if depth == 0 => prelude_start = i + 1,
            _ => {}
        }
        i += 1;
    }
    blocks
}

/// Style-rule selectors of `css`, descending into grouping at-rules and
/// skipping keyframes, font faces and other non-selector blocks.
fn css_rule_selectors(css: &str, out: &mut Vec<String>) {
    for block in css_blocks(css) {
        if block.prelude.starts_with('@') {
            if block.is_grouping() {
                css_rule_selectors(block.body, out);
            }
            continue;
        }
        out.extend(block.selectors().into_iter().map(str::to_string));
    }
}

fn quoted_arguments(regex: &Regex, js: &str) -> Vec<String> {
    regex
        .captures_iter(js)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Selectors a code segment depends on: CSS rule heads, or the selectors
/// passed to `waitForElement` in JS. Distinct, in first-seen order.
pub fn extract_selectors(code: &str, kind: CodeKind) -> Vec<String> {
    let found = match kind {
        CodeKind::Css => {
            let mut out = Vec::new();
            css_rule_selectors(&blank_comments(code), &mut out);
            out
        }
        CodeKind::Js => quoted_arguments(&WAIT_FOR_ELEMENT, code),
    };
    dedup(found)
}

/// Like [`extract_selectors`], but for JS also counts selectors handed to
/// DOM queries and harness helpers.
pub fn referenced_selectors(code: &str, kind: CodeKind) -> Vec<String> {
    match kind {
        CodeKind::Css => extract_selectors(code, kind),
        CodeKind::Js => dedup(quoted_arguments(&DOM_QUERY, code)),
    }
}

/// Comparison form: dynamic pseudo-classes and pseudo-elements removed,
/// structural qualifiers such as `:nth-of-type(2)` kept, whitespace collapsed.
pub fn normalize_selector(selector: &str) -> String {
    let stripped = DYNAMIC_PSEUDO.replace_all(selector, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on `separator` outside of parentheses, brackets and quotes.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (idx, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_rule_heads() {
        let css = "/* hero { x } */\n#cta, .btn:hover { color: red; }\n@media (max-width: 600px) { nav a { display: none; } }\n@keyframes pulse { from { opacity: 0; } to { opacity: 1; } }\n@font-face { font-family: X; }";
        assert_eq!(
            extract_selectors(css, CodeKind::Css),
            vec!["#cta", ".btn:hover", "nav a"]
        );
    }

    #[test]
    fn test_css_ignores_braces_in_strings() {
        let css = "#cta::after { content: \"}\"; }\n#hero-h1 { color: blue; }";
        assert_eq!(
            extract_selectors(css, CodeKind::Css),
            vec!["#cta::after", "#hero-h1"]
        );
    }

    #[test]
    fn test_css_at_import_is_skipped() {
        let css = "@import url('x.css');\n#cta { color: red; }";
        assert_eq!(extract_selectors(css, CodeKind::Css), vec!["#cta"]);
    }

    #[test]
    fn test_js_wait_for_element_only() {
        let js = "waitForElement('#cta').then(el => el.click());\nwaitForElement(\"nav a\", 3000);\ndocument.querySelector('.other');";
        assert_eq!(extract_selectors(js, CodeKind::Js), vec!["#cta", "nav a"]);
        assert_eq!(
            referenced_selectors(js, CodeKind::Js),
            vec!["#cta", "nav a", ".other"]
        );
    }

    #[test]
    fn test_normalize_keeps_structural_pseudo() {
        assert_eq!(normalize_selector("#cta:hover"), "#cta");
        assert_eq!(normalize_selector("a:focus-visible::before"), "a");
        assert_eq!(normalize_selector("li:nth-of-type(2)"), "li:nth-of-type(2)");
        assert_eq!(normalize_selector("nav   a"), "nav a");
    }

    #[test]
    fn test_split_top_level_respects_parens() {
        assert_eq!(
            split_top_level("a:is(.x, .y), b", ','),
            vec!["a:is(.x, .y)", "b"]
        );
    }

    #[test]
    fn test_css_blocks_text_spans() {
        let css = "  #a { color: red; }\n#b{x:y}";
        let blocks = css_blocks(css);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "#a { color: red; }");
        assert_eq!(blocks[1].prelude, "#b");
        assert_eq!(blocks[1].body, "x:y");
    }
}
