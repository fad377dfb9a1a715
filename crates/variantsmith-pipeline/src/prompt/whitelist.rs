use std::collections::HashSet;

use variantsmith_protocols::{ElementDatabase, SelectedElement};

/// Every database selector, alternates included: the selected element
/// first (when the database knows it), then database order.
pub fn build_whitelist(database: &ElementDatabase, selected: Option<&SelectedElement>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut whitelist = Vec::new();

    if let Some(selected) = selected {
        if database.contains_selector(&selected.selector) && seen.insert(selected.selector.as_str()) {
            whitelist.push(selected.selector.clone());
        }
    }
    for selector in database.elements.iter().flat_map(|e| e.all_selectors()) {
        if seen.insert(selector) {
            whitelist.push(selector.to_string());
        }
    }
    whitelist
}
