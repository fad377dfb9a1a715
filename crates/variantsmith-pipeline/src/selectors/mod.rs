//! Selector Validator & Repairer.
//!
//! Every selector the generated code depends on is cross-checked against
//! the captured element database. Misses become warnings; a conservative
//! repair pass rewrites generic selectors when the database holds exactly
//! one more specific match. Neither step blocks applying the code.

mod extract;
mod repair;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use variantsmith_protocols::{CodeKind, CodeLocation, ElementDatabase, GeneratedCode};

pub use extract::{extract_selectors, normalize_selector, referenced_selectors};
pub(crate) use extract::{blank_comments, css_blocks, split_top_level};
pub use repair::{RepairReport, SelectorRepair, repair};

/// A selector used by the code that the database does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorWarning {
    /// Normalized form of the offending selector.
    pub selector: String,
    /// First segment it was seen in.
    pub location: CodeLocation,
    pub kind: CodeKind,
    pub message: String,
}

/// Report each unknown selector once per language, in first-seen order.
pub fn validate(code: &GeneratedCode, database: &ElementDatabase) -> Vec<SelectorWarning> {
    let raw_known = database.selector_set();
    let known: HashSet<String> = raw_known.iter().map(|s| normalize_selector(s)).collect();

    let mut seen = HashSet::new();
    let mut warnings = Vec::new();
    for (location, kind, text) in code.segments() {
        for selector in extract_selectors(text, kind) {
            if raw_known.contains(selector.as_str()) {
                continue;
            }
            let normalized = normalize_selector(&selector);
            if normalized.is_empty() || known.contains(&normalized) {
                continue;
            }
            if !seen.insert((normalized.clone(), kind)) {
                continue;
            }
            warnings.push(SelectorWarning {
                message: format!(
                    "Selector '{}' used in {} {} is not in the element database",
                    normalized, location, kind
                ),
                selector: normalized,
                location,
                kind,
            });
        }
    }
    warnings
}

#[cfg(test)]
#[path = "selectors_tests.rs"]
mod tests;
