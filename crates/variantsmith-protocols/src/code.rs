//! Generated variation code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One experiment arm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    /// 1-based, unique within one generation.
    pub number: u32,

    pub name: String,

    #[serde(default)]
    pub css: String,

    #[serde(default)]
    pub js: String,
}

impl Variation {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            css: String::new(),
            js: String::new(),
        }
    }

    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    pub fn with_js(mut self, js: impl Into<String>) -> Self {
        self.js = js.into();
        self
    }

    pub fn has_code(&self) -> bool {
        !self.css.trim().is_empty() || !self.js.trim().is_empty()
    }
}

/// Canonical parsed output: variations plus code shared by all of them.
///
/// Created by the parser, rewritten in place by selector repair, then
/// treated as immutable history once applied to a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCode {
    #[serde(default)]
    pub variations: Vec<Variation>,

    #[serde(default, rename = "globalCSS")]
    pub global_css: String,

    #[serde(default, rename = "globalJS")]
    pub global_js: String,
}

/// Where a piece of code lives inside [`GeneratedCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeLocation {
    Global,
    Variation(u32),
}

impl fmt::Display for CodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeLocation::Global => f.write_str("global"),
            CodeLocation::Variation(n) => write!(f, "variation {}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Css,
    Js,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::Css => f.write_str("CSS"),
            CodeKind::Js => f.write_str("JS"),
        }
    }
}

/// CSS/JS handed to the in-page sandbox for one variation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePayload {
    pub css: String,
    pub js: String,
}

impl GeneratedCode {
    pub fn new(variations: Vec<Variation>) -> Self {
        Self {
            variations,
            global_css: String::new(),
            global_js: String::new(),
        }
    }

    /// No variations were produced.
    pub fn is_empty(&self) -> bool {
        self.variations.is_empty()
    }

    pub fn variation(&self, number: u32) -> Option<&Variation> {
        self.variations.iter().find(|v| v.number == number)
    }

    /// Every non-empty code segment with its location and language.
    pub fn segments(&self) -> Vec<(CodeLocation, CodeKind, &str)> {
        let mut segments = Vec::new();
        if !self.global_css.trim().is_empty() {
            segments.push((CodeLocation::Global, CodeKind::Css, self.global_css.as_str()));
        }
        if !self.global_js.trim().is_empty() {
            segments.push((CodeLocation::Global, CodeKind::Js, self.global_js.as_str()));
        }
        for v in &self.variations {
            if !v.css.trim().is_empty() {
                segments.push((CodeLocation::Variation(v.number), CodeKind::Css, v.css.as_str()));
            }
            if !v.js.trim().is_empty() {
                segments.push((CodeLocation::Variation(v.number), CodeKind::Js, v.js.as_str()));
            }
        }
        segments
    }

    /// Mutable access to one segment.
    pub fn segment_mut(&mut self, location: CodeLocation, kind: CodeKind) -> Option<&mut String> {
        match location {
            CodeLocation::Global => Some(match kind {
                CodeKind::Css => &mut self.global_css,
                CodeKind::Js => &mut self.global_js,
            }),
            CodeLocation::Variation(n) => self
                .variations
                .iter_mut()
                .find(|v| v.number == n)
                .map(|v| match kind {
                    CodeKind::Css => &mut v.css,
                    CodeKind::Js => &mut v.js,
                }),
        }
    }

    /// Global code merged with one variation's code.
    pub fn payload_for(&self, number: u32) -> Option<CodePayload> {
        let variation = self.variation(number)?;
        Some(CodePayload {
            css: join_code(&self.global_css, &variation.css),
            js: join_code(&self.global_js, &variation.js),
        })
    }

    /// Renumber variations 1..=n in their current order.
    pub fn renumber(&mut self) {
        for (idx, v) in self.variations.iter_mut().enumerate() {
            v.number = idx as u32 + 1;
        }
    }
}

fn join_code(global: &str, local: &str) -> String {
    match (global.trim().is_empty(), local.trim().is_empty()) {
        (true, _) => local.to_string(),
        (false, true) => global.to_string(),
        (false, false) => format!("{}\n\n{}", global.trim_end(), local),
    }
}
