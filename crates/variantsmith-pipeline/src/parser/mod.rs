//! Response Parser.
//!
//! Model output format cannot be fully enforced, so parsing is an ordered
//! chain of strategies, each a graceful degradation of the previous one.
//! The first strategy producing a non-empty `variations` list wins.

mod json;
mod legacy;
mod strategies;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use variantsmith_protocols::GeneratedCode;

pub use json::{FencedBlock, extract_json_where, fenced_blocks, parse_from_first_brace, parse_strict};

/// Which strategy recovered the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    StrictJson,
    FencedJson,
    EmbeddedJson,
    FencedCode,
    LegacyMarkers,
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParseStrategy::StrictJson => "strict JSON",
            ParseStrategy::FencedJson => "fenced JSON",
            ParseStrategy::EmbeddedJson => "embedded JSON",
            ParseStrategy::FencedCode => "fenced CSS/JS blocks",
            ParseStrategy::LegacyMarkers => "legacy section markers",
        };
        f.write_str(label)
    }
}

type Strategy = fn(&str) -> Option<GeneratedCode>;

const STRATEGIES: [(ParseStrategy, Strategy); 5] = [
    (ParseStrategy::StrictJson, strategies::strict_json),
    (ParseStrategy::FencedJson, strategies::fenced_json),
    (ParseStrategy::EmbeddedJson, strategies::embedded_json),
    (ParseStrategy::FencedCode, strategies::fenced_code),
    (ParseStrategy::LegacyMarkers, legacy::markers),
];

/// Parser output. `strategy` is `None` when every strategy was exhausted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResponse {
    pub code: GeneratedCode,
    pub strategy: Option<ParseStrategy>,
}

impl ParsedResponse {
    pub fn is_exhausted(&self) -> bool {
        self.strategy.is_none()
    }
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parse raw model text. Never fails; an exhausted parse yields empty code.
    pub fn parse(raw: &str) -> ParsedResponse {
        for (strategy, run) in STRATEGIES {
            if let Some(mut code) = run(raw) {
                if code.is_empty() {
                    continue;
                }
                normalize_numbers(&mut code);
                debug!(
                    strategy = %strategy,
                    variations = code.variations.len(),
                    "Parsed model response"
                );
                return ParsedResponse {
                    code,
                    strategy: Some(strategy),
                };
            }
        }

        warn!(raw_len = raw.len(), raw = %raw, "No parse strategy matched the model response");
        ParsedResponse::default()
    }
}

// Variation numbers must be unique and 1-based.
fn normalize_numbers(code: &mut GeneratedCode) {
    let mut seen = HashSet::new();
    let valid = code
        .variations
        .iter()
        .all(|v| v.number > 0 && seen.insert(v.number));
    if !valid {
        code.renumber();
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
