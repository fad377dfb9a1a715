use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use variantsmith_protocols::{CodeKind, CodeLocation, ElementDatabase, ElementRecord, GeneratedCode};

use super::{SelectorWarning, validate};

static COMPOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9-]*)?((?:\.[A-Za-z_-][A-Za-z0-9_-]*)+)$").expect("valid regex")
});

static CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.([A-Za-z_-][A-Za-z0-9_-]*)").expect("valid regex"));

static LEADING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9-]*)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorRepair {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReport {
    pub repairs: Vec<SelectorRepair>,
    /// Warnings still present after repair.
    pub unrepairable: Vec<SelectorWarning>,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        self.unrepairable.is_empty()
    }
}

#[derive(Debug, Default)]
struct Signature {
    tag: Option<String>,
    classes: BTreeSet<String>,
}

impl Signature {
    fn covers(&self, generic: &Signature) -> bool {
        let tag_ok = match &generic.tag {
            Some(tag) => self.tag.as_deref() == Some(tag.as_str()),
            None => true,
        };
        tag_ok && generic.classes.is_subset(&self.classes)
    }
}

fn classes_of(compound: &str) -> impl Iterator<Item = String> + '_ {
    CLASS.captures_iter(compound).map(|caps| caps[1].to_string())
}

/// Signature of a selector made of one `tag.class` compound with at least
/// one class.
fn generic_signature(selector: &str) -> Option<Signature> {
    let caps = COMPOUND.captures(selector)?;
    Some(Signature {
        tag: caps.get(1).map(|m| m.as_str().to_ascii_lowercase()),
        classes: classes_of(caps.get(2)?.as_str()).collect(),
    })
}

fn last_compound(selector: &str) -> &str {
    selector
        .rsplit(|c: char| c.is_whitespace() || matches!(c, '>' | '+' | '~'))
        .next()
        .unwrap_or(selector)
}

fn element_signature(element: &ElementRecord) -> Signature {
    let compound = last_compound(&element.selector);
    let tag = if element.tag.is_empty() {
        LEADING_TAG
            .captures(compound)
            .map(|caps| caps[1].to_ascii_lowercase())
    } else {
        Some(element.tag.to_ascii_lowercase())
    };
    let mut classes: BTreeSet<String> = element.classes.iter().cloned().collect();
    classes.extend(classes_of(compound));
    Signature { tag, classes }
}

fn is_specific(selector: &str) -> bool {
    selector.contains('#')
        || [":nth-", ":first-", ":last-", ":only-"]
            .iter()
            .any(|q| selector.contains(q))
}

/// The single more specific database selector for a generic one.
fn find_replacement(generic: &str, database: &ElementDatabase) -> Option<String> {
    let signature = generic_signature(generic)?;
    let mut candidates = database
        .elements
        .iter()
        .filter(|element| element_signature(element).covers(&signature));
    let only = candidates.next()?;
    if candidates.next().is_some() {
        return None;
    }
    only.all_selectors().find(|s| is_specific(s)).map(str::to_string)
}

fn boundary_before(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, ',' | '>' | '+' | '~' | '(' | '{' | '}' | ';' | '\'' | '"' | '`'),
    }
}

fn boundary_after(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => {
            c.is_whitespace()
                || matches!(c, ',' | '{' | ':' | '>' | '+' | '~' | ')' | ';' | '\'' | '"' | '`')
        }
    }
}

/// Replace standalone occurrences of `from`, leaving text that already
/// reads `to` alone.
pub(crate) fn replace_selector(text: &str, from: &str, to: &str) -> (String, usize) {
    let guards: Vec<usize> = to.match_indices(from).map(|(offset, _)| offset).collect();
    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    let mut count = 0usize;

    for (pos, _) in text.match_indices(from) {
        if pos < last {
            continue;
        }
        let end = pos + from.len();
        if !boundary_before(text[..pos].chars().next_back()) || !boundary_after(text[end..].chars().next()) {
            continue;
        }
        let already = guards.iter().any(|&offset| {
            pos >= offset
                && text
                    .get(pos - offset..)
                    .is_some_and(|rest| rest.starts_with(to))
        });
        if already {
            continue;
        }
        out.push_str(&text[last..pos]);
        out.push_str(to);
        last = end;
        count += 1;
    }
    out.push_str(&text[last..]);
    (out, count)
}

/// Rewrite repairable selectors in place across every CSS and JS segment.
///
/// Running it again on its own output changes nothing.
pub fn repair(code: &mut GeneratedCode, database: &ElementDatabase) -> RepairReport {
    let warnings = validate(code, database);
    let mut repairs: Vec<SelectorRepair> = Vec::new();
    for warning in &warnings {
        if repairs.iter().any(|r| r.from == warning.selector) {
            continue;
        }
        if let Some(to) = find_replacement(&warning.selector, database) {
            repairs.push(SelectorRepair {
                from: warning.selector.clone(),
                to,
            });
        }
    }

    if !repairs.is_empty() {
        let segments: Vec<(CodeLocation, CodeKind)> = code
            .segments()
            .into_iter()
            .map(|(location, kind, _)| (location, kind))
            .collect();
        for (location, kind) in segments {
            let Some(segment) = code.segment_mut(location, kind) else {
                continue;
            };
            for repair in &repairs {
                let (rewritten, count) = replace_selector(segment, &repair.from, &repair.to);
                if count > 0 {
                    debug!(from = %repair.from, to = %repair.to, %location, %kind, count, "Repaired selector");
                    *segment = rewritten;
                }
            }
        }
    }

    let unrepairable = validate(code, database);
    for warning in &unrepairable {
        warn!(selector = %warning.selector, location = %warning.location, kind = %warning.kind, "Unrepairable selector");
    }
    RepairReport {
        repairs,
        unrepairable,
    }
}
