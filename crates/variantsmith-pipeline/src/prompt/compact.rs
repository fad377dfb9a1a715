use serde::Serialize;
use variantsmith_protocols::{ElementDatabase, ElementLevel, ElementRecord, SelectedElement, VisualInfo};

const MAX_ALTERNATES: usize = 2;

/// Field-pruned element record for prompt serialization.
///
/// Drops HTML excerpts, attribute maps and ancestor chains; text is
/// whitespace-collapsed and truncated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactElement<'a> {
    pub selector: &'a str,

    #[serde(skip_serializing_if = "str::is_empty")]
    pub tag: &'a str,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,

    pub level: ElementLevel,

    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub classes: &'a [String],

    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<&'a str>,

    #[serde(skip_serializing_if = "is_blank_visual")]
    pub visual: &'a VisualInfo,

    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub alternates: &'a [String],
}

fn is_blank_visual(visual: &&VisualInfo) -> bool {
    **visual == VisualInfo::default()
}

impl<'a> CompactElement<'a> {
    pub fn new(element: &'a ElementRecord, text_limit: usize) -> Self {
        let alternates = &element.alternates[..element.alternates.len().min(MAX_ALTERNATES)];
        Self {
            selector: &element.selector,
            tag: &element.tag,
            text: truncate_text(&element.text, text_limit),
            level: element.level,
            classes: &element.classes,
            section: element.section.as_deref(),
            visual: &element.visual,
            alternates,
        }
    }
}

/// Collapse whitespace and cut to `limit` characters, marking the cut.
pub fn truncate_text(text: &str, limit: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= limit {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

/// Elements to serialize: the selected subtree when a scope is active and
/// non-empty, otherwise the whole database; capped at `max_elements`.
pub fn scoped_elements<'a>(
    database: &'a ElementDatabase,
    selected: Option<&SelectedElement>,
    max_elements: usize,
) -> (Vec<&'a ElementRecord>, bool) {
    let scoped: Vec<&ElementRecord> = match selected {
        Some(selected) => database
            .elements
            .iter()
            .filter(|e| e.is_within(&selected.selector))
            .collect(),
        None => Vec::new(),
    };
    let filtered = !scoped.is_empty();
    let pool = if filtered {
        scoped
    } else {
        database.elements.iter().collect()
    };
    (pool.into_iter().take(max_elements).collect(), filtered)
}
