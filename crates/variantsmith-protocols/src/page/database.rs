//! The element database captured for one generation turn.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ElementRecord;

/// How the capture was scoped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    #[default]
    Full,
    Focused,
    #[serde(other)]
    Other,
}

/// Capture metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseMetadata {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub total_elements: usize,

    #[serde(default)]
    pub estimated_tokens: usize,

    #[serde(default)]
    pub mode: ExtractionMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_path: Option<String>,
}

/// Ordered element records plus capture metadata.
///
/// Immutable once captured; a new capture produces a new database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementDatabase {
    pub elements: Vec<ElementRecord>,

    #[serde(default)]
    pub metadata: DatabaseMetadata,
}

impl ElementDatabase {
    pub fn new(elements: Vec<ElementRecord>, metadata: DatabaseMetadata) -> Self {
        Self { elements, metadata }
    }

    /// Build a database from records alone, filling counts in the metadata.
    pub fn from_elements(url: impl Into<String>, elements: Vec<ElementRecord>) -> Self {
        let metadata = DatabaseMetadata {
            url: url.into(),
            total_elements: elements.len(),
            ..Default::default()
        };
        Self { elements, metadata }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Primary selectors in database order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.selector.as_str())
    }

    /// Every selector known to the database, including alternates.
    pub fn selector_set(&self) -> HashSet<&str> {
        self.elements.iter().flat_map(|e| e.all_selectors()).collect()
    }

    /// Whether `selector` appears verbatim as a primary or alternate selector.
    pub fn contains_selector(&self, selector: &str) -> bool {
        self.elements
            .iter()
            .any(|e| e.all_selectors().any(|s| s == selector))
    }

    /// Find the record owning `selector` (primary or alternate).
    pub fn find(&self, selector: &str) -> Option<&ElementRecord> {
        self.elements
            .iter()
            .find(|e| e.all_selectors().any(|s| s == selector))
    }
}
