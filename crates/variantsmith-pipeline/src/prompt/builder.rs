use std::fmt::Write;

use variantsmith_protocols::{
    ElementDatabase, GenerationRequest, ImageSource, Message, SelectedElement, VariationSpec,
};

use super::compact::{CompactElement, scoped_elements};
use super::templates::{OUTPUT_FORMAT, SCOPE_KEYWORDS};
use super::whitelist::build_whitelist;

/// Builds generation prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Prompt text for `request`, with optional conversation context
    /// (previous code, feedback, history) appended before the output format.
    pub fn build(&self, request: &GenerationRequest, conversation_context: Option<&str>) -> String {
        let database = &request.page_data.database;
        let selected = request.selected_element.as_ref();
        let mut prompt = String::new();

        write_whitelist(&mut prompt, database, selected);
        if let Some(selected) = selected {
            write_scope(&mut prompt, selected, &request.description);
        }

        let _ = writeln!(prompt, "## USER REQUEST\n{}\n", request.description.trim());
        write_variations(&mut prompt, &request.variation_specs);

        let (elements, filtered) =
            scoped_elements(database, selected, request.settings.max_elements);
        write_page(&mut prompt, request, elements.len(), filtered);

        let compact: Vec<CompactElement<'_>> = elements
            .iter()
            .map(|e| CompactElement::new(e, request.settings.text_limit))
            .collect();
        let json = serde_json::to_string_pretty(&compact).unwrap_or_else(|_| "[]".to_string());
        let _ = writeln!(prompt, "## ELEMENT DATABASE\n```json\n{}\n```\n", json);

        if let Some(context) = conversation_context.map(str::trim).filter(|c| !c.is_empty()) {
            let _ = writeln!(prompt, "{}\n", context);
        }

        prompt.push_str(OUTPUT_FORMAT);
        prompt.push('\n');
        prompt
    }

    /// The user message for `request`, carrying the screenshot when one is
    /// attached and enabled.
    pub fn messages(&self, request: &GenerationRequest, conversation_context: Option<&str>) -> Vec<Message> {
        let text = self.build(request, conversation_context);
        let images = match (&request.page_data.screenshot, request.settings.attach_screenshot) {
            (Some(screenshot), true) if !screenshot.trim().is_empty() => {
                vec![ImageSource::from_data_url(screenshot)]
            }
            _ => Vec::new(),
        };
        vec![Message::user_with_images(text, images)]
    }
}

/// Whether the request is about a container as a whole rather than
/// something inside it.
pub(crate) fn is_container_request(description: &str) -> bool {
    let lower = description.to_lowercase();
    SCOPE_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn write_whitelist(prompt: &mut String, database: &ElementDatabase, selected: Option<&SelectedElement>) {
    let whitelist = build_whitelist(database, selected);
    prompt.push_str("## SELECTOR WHITELIST\n");
    prompt.push_str(
        "You may ONLY use the selectors listed below. They were verified against the live page.\n\
         Using ANY selector that is not in this list, in CSS or in JavaScript, makes the whole response INVALID.\n",
    );
    if whitelist.is_empty() {
        prompt.push_str("(no elements were captured; do not target any element)\n");
    }
    for (idx, selector) in whitelist.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", idx + 1, selector);
    }
    prompt.push('\n');
}

fn write_scope(prompt: &mut String, selected: &SelectedElement, description: &str) {
    let _ = write!(prompt, "## SEARCH SCOPE\nThe user selected `{}`", selected.selector);
    if !selected.tag.is_empty() {
        let _ = write!(prompt, " (<{}>", selected.tag);
        if !selected.text.trim().is_empty() {
            let _ = write!(prompt, " \"{}\"", super::truncate_text(&selected.text, 60));
        }
        prompt.push(')');
    }
    prompt.push_str(".\n");
    prompt.push_str(
        "This element defines the SEARCH SCOPE for the request. It is NOT automatically the element to change.\n\
         - Find the element(s) inside this scope whose type or text matches the request (button, headline, link, image, ...).\n\
         - Change the selected element itself ONLY when the request is about the container as a whole \
         (its style, background, spacing or \"this section\").\n",
    );
    if is_container_request(description) {
        prompt.push_str("- This request reads as container-level; the selected element itself is a valid target.\n");
    }
    prompt.push('\n');
}

fn write_variations(prompt: &mut String, specs: &[VariationSpec]) {
    prompt.push_str("## VARIATIONS\n");
    if specs.is_empty() {
        prompt.push_str("Create exactly 1 variation that implements the request.\n\n");
        return;
    }
    let _ = writeln!(prompt, "Create exactly {} variation(s):", specs.len());
    for (idx, spec) in specs.iter().enumerate() {
        if spec.description.trim().is_empty() {
            let _ = writeln!(prompt, "{}. {}", idx + 1, spec.name);
        } else {
            let _ = writeln!(prompt, "{}. {}: {}", idx + 1, spec.name, spec.description.trim());
        }
    }
    prompt.push('\n');
}

fn write_page(prompt: &mut String, request: &GenerationRequest, shown: usize, filtered: bool) {
    let metadata = &request.page_data.database.metadata;
    let total = request.page_data.database.len();
    prompt.push_str("## PAGE\n");
    if !metadata.url.is_empty() {
        let _ = writeln!(prompt, "URL: {}", metadata.url);
    }
    if !metadata.title.is_empty() {
        let _ = writeln!(prompt, "Title: {}", metadata.title);
    }
    let _ = write!(prompt, "Elements shown: {} of {}", shown, total);
    if filtered {
        prompt.push_str(" (limited to the search scope)");
    }
    prompt.push('\n');
    let has_screenshot = request.settings.attach_screenshot
        && request
            .page_data
            .screenshot
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
    if has_screenshot {
        prompt.push_str("A screenshot of the page is attached.\n");
    }
    prompt.push('\n');
}
