//! Additive-merge guard.
//!
//! Compares an adjustment turn's output with the code it was based on.
//! CSS is compared per `(at-rule, selector, property)`; JS per top-level
//! statement that references a selector. Whatever the new code dropped is
//! reported and, when enforcing, carried forward.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use variantsmith_protocols::{CodeKind, CodeLocation, GeneratedCode};

use crate::selectors::{blank_comments, css_blocks, referenced_selectors, split_top_level};

/// Something the previous turn had that the new output lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeViolation {
    pub selector: String,
    pub location: CodeLocation,
    pub kind: CodeKind,
    /// Dropped CSS declarations (`property: value`) or JS statements.
    pub dropped: Vec<String>,
    /// The dropped code was carried forward into the output.
    pub restored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    context: Option<String>,
    selector: String,
    property: String,
    value: String,
}

enum Restoration {
    Append {
        location: CodeLocation,
        kind: CodeKind,
        text: String,
    },
    Variation(u32),
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_declarations(css: &str, context: Option<&str>, out: &mut Vec<Declaration>) {
    for block in css_blocks(css) {
        if block.prelude.starts_with('@') {
            if block.is_grouping() {
                collect_declarations(block.body, Some(block.prelude), out);
            }
            continue;
        }
        for selector in block.selectors() {
            for declaration in split_top_level(block.body, ';') {
                let Some((property, value)) = declaration.split_once(':') else {
                    continue;
                };
                let property = property.trim().to_ascii_lowercase();
                if property.is_empty() {
                    continue;
                }
                out.push(Declaration {
                    context: context.map(collapse),
                    selector: collapse(selector),
                    property,
                    value: value.trim().to_string(),
                });
            }
        }
    }
}

fn css_declarations(css: &str) -> Vec<Declaration> {
    let mut out = Vec::new();
    collect_declarations(&blank_comments(css), None, &mut out);
    out
}

/// Top-level JS statements in source order.
pub(crate) fn top_level_statements(js: &str) -> Vec<String> {
    let chars: Vec<char> = js.chars().collect();
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' | '`' => {
                current.push(c);
                i += 1;
                while i < chars.len() {
                    current.push(chars[i]);
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        current.push(chars[i + 1]);
                        i += 2;
                        continue;
                    }
                    if chars[i] == c {
                        break;
                    }
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i += 2;
                continue;
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth -= 1;
                current.push(c);
            }
            '}' => {
                depth -= 1;
                current.push(c);
                if depth == 0 && !continues_after_block(&chars[i + 1..]) {
                    flush(&mut current, &mut statements);
                }
            }
            ';' if depth == 0 => {
                current.push(c);
                flush(&mut current, &mut statements);
            }
            _ => current.push(c),
        }
        i += 1;
    }
    flush(&mut current, &mut statements);
    statements
}

fn flush(current: &mut String, statements: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
    current.clear();
}

fn continues_after_block(rest: &[char]) -> bool {
    let tail: String = rest.iter().skip_while(|c| c.is_whitespace()).take(8).collect();
    tail.starts_with(')')
        || tail.starts_with('.')
        || tail.starts_with(',')
        || tail.starts_with(';')
        || tail.starts_with("else")
        || tail.starts_with("catch")
        || tail.starts_with("finally")
        || tail.starts_with("while")
}

fn css_changes(location: CodeLocation, previous: &str, next: &str) -> Vec<(MergeViolation, Restoration)> {
    let kept: HashSet<(Option<String>, String, String)> = css_declarations(next)
        .into_iter()
        .map(|d| (d.context, d.selector, d.property))
        .collect();

    let mut missing: Vec<(Option<String>, String, Vec<String>)> = Vec::new();
    for declaration in css_declarations(previous) {
        let key = (
            declaration.context.clone(),
            declaration.selector.clone(),
            declaration.property.clone(),
        );
        if kept.contains(&key) {
            continue;
        }
        let line = format!("{}: {}", declaration.property, declaration.value);
        match missing
            .iter_mut()
            .find(|(context, selector, _)| *context == declaration.context && *selector == declaration.selector)
        {
            Some((_, _, lines)) => {
                if !lines.contains(&line) {
                    lines.push(line);
                }
            }
            None => missing.push((declaration.context, declaration.selector, vec![line])),
        }
    }

    missing
        .into_iter()
        .map(|(context, selector, dropped)| {
            let rule = format!("{} {{ {}; }}", selector, dropped.join("; "));
            let text = match &context {
                Some(at_rule) => format!("{} {{\n  {}\n}}", at_rule, rule),
                None => rule,
            };
            (
                MergeViolation {
                    selector,
                    location,
                    kind: CodeKind::Css,
                    dropped,
                    restored: false,
                },
                Restoration::Append {
                    location,
                    kind: CodeKind::Css,
                    text,
                },
            )
        })
        .collect()
}

fn js_changes(location: CodeLocation, previous: &str, next: &str) -> Vec<(MergeViolation, Restoration)> {
    let next_collapsed = collapse(next);
    let next_refs: HashSet<String> = referenced_selectors(next, CodeKind::Js).into_iter().collect();

    top_level_statements(previous)
        .into_iter()
        .filter(|statement| !next_collapsed.contains(&collapse(statement)))
        .filter_map(|statement| {
            let lost = referenced_selectors(&statement, CodeKind::Js)
                .into_iter()
                .find(|selector| !next_refs.contains(selector))?;
            Some((
                MergeViolation {
                    selector: lost,
                    location,
                    kind: CodeKind::Js,
                    dropped: vec![statement.clone()],
                    restored: false,
                },
                Restoration::Append {
                    location,
                    kind: CodeKind::Js,
                    text: statement,
                },
            ))
        })
        .collect()
}

fn segment(code: &GeneratedCode, location: CodeLocation, kind: CodeKind) -> &str {
    let text = match location {
        CodeLocation::Global => Some(match kind {
            CodeKind::Css => &code.global_css,
            CodeKind::Js => &code.global_js,
        }),
        CodeLocation::Variation(n) => code.variation(n).map(|v| match kind {
            CodeKind::Css => &v.css,
            CodeKind::Js => &v.js,
        }),
    };
    text.map(String::as_str).unwrap_or("")
}

fn analyze(previous: &GeneratedCode, next: &GeneratedCode) -> Vec<(MergeViolation, Restoration)> {
    let mut changes = Vec::new();
    for (location, kind, text) in previous.segments() {
        if let CodeLocation::Variation(n) = location {
            if next.variation(n).is_none() {
                continue;
            }
        }
        let current = segment(next, location, kind);
        match kind {
            CodeKind::Css => changes.extend(css_changes(location, text, current)),
            CodeKind::Js => changes.extend(js_changes(location, text, current)),
        }
    }

    for variation in &previous.variations {
        if next.variation(variation.number).is_some() || !variation.has_code() {
            continue;
        }
        let location = CodeLocation::Variation(variation.number);
        let dropped = vec![format!("variation {} ({})", variation.number, variation.name)];
        let mut referenced: Vec<(CodeKind, String)> = Vec::new();
        for (kind, text) in [(CodeKind::Css, &variation.css), (CodeKind::Js, &variation.js)] {
            referenced.extend(referenced_selectors(text, kind).into_iter().map(|s| (kind, s)));
        }
        if referenced.is_empty() {
            referenced.push((CodeKind::Js, String::new()));
        }
        for (kind, selector) in referenced {
            changes.push((
                MergeViolation {
                    selector,
                    location,
                    kind,
                    dropped: dropped.clone(),
                    restored: false,
                },
                Restoration::Variation(variation.number),
            ));
        }
    }
    changes
}

/// Report what `next` dropped from `previous` without changing anything.
pub fn check_additive(previous: &GeneratedCode, next: &GeneratedCode) -> Vec<MergeViolation> {
    let violations: Vec<MergeViolation> = analyze(previous, next).into_iter().map(|(v, _)| v).collect();
    for violation in &violations {
        warn!(
            selector = %violation.selector,
            location = %violation.location,
            kind = %violation.kind,
            "Adjustment dropped previously applied code"
        );
    }
    violations
}

/// Carry everything `next` dropped from `previous` forward into `next`.
pub fn enforce_additive(previous: &GeneratedCode, next: &mut GeneratedCode) -> Vec<MergeViolation> {
    let changes = analyze(previous, next);
    let mut restored_variations = HashSet::new();
    let mut violations = Vec::with_capacity(changes.len());

    for (mut violation, restoration) in changes {
        match restoration {
            Restoration::Append { location, kind, text } => {
                if let Some(target) = next.segment_mut(location, kind) {
                    if !target.trim().is_empty() {
                        target.push_str("\n\n");
                    }
                    target.push_str(&text);
                    violation.restored = true;
                }
            }
            Restoration::Variation(number) => {
                if restored_variations.insert(number) {
                    if let Some(variation) = previous.variation(number) {
                        next.variations.push(variation.clone());
                    }
                }
                violation.restored = true;
            }
        }
        warn!(
            selector = %violation.selector,
            location = %violation.location,
            kind = %violation.kind,
            "Carried forward code the adjustment dropped"
        );
        violations.push(violation);
    }

    next.variations.sort_by_key(|v| v.number);
    violations
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
