//! Generation request types.

use serde::{Deserialize, Serialize};

use super::ElementDatabase;

/// What the capture service handed over for this turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    /// Screenshot as a data URL or plain URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,

    #[serde(alias = "elementDatabase")]
    pub database: ElementDatabase,
}

/// One requested experiment arm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariationSpec {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

impl VariationSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Prompt-shaping settings for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    /// Element text is truncated to this many characters.
    pub text_limit: usize,

    /// At most this many elements are serialized into the prompt.
    pub max_elements: usize,

    /// Attach the page screenshot when one is available.
    pub attach_screenshot: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            text_limit: 80,
            max_elements: 400,
            attach_screenshot: true,
        }
    }
}

/// The element a user picked on the page.
///
/// Narrows the search scope; it is not automatically the edit target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedElement {
    pub selector: String,

    #[serde(default)]
    pub tag: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub classes: Vec<String>,
}

impl SelectedElement {
    pub fn new(selector: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }
}

/// Everything the Prompt Builder needs for an initial generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub page_data: PageData,

    pub description: String,

    #[serde(default)]
    pub variation_specs: Vec<VariationSpec>,

    #[serde(default)]
    pub settings: GenerationSettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_element: Option<SelectedElement>,
}

impl GenerationRequest {
    pub fn new(database: ElementDatabase, description: impl Into<String>) -> Self {
        Self {
            page_data: PageData {
                screenshot: None,
                database,
            },
            description: description.into(),
            variation_specs: Vec::new(),
            settings: GenerationSettings::default(),
            selected_element: None,
        }
    }

    pub fn with_variations(mut self, specs: Vec<VariationSpec>) -> Self {
        self.variation_specs = specs;
        self
    }

    pub fn with_selected(mut self, selected: SelectedElement) -> Self {
        self.selected_element = Some(selected);
        self
    }

    pub fn with_screenshot(mut self, screenshot: impl Into<String>) -> Self {
        self.page_data.screenshot = Some(screenshot.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_settings_default() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.text_limit, 80);
        assert!(settings.attach_screenshot);
    }

    #[test]
    fn test_generation_request_builder() {
        let request = GenerationRequest::new(ElementDatabase::default(), "make it pop")
            .with_variations(vec![VariationSpec::new("Bold", "bolder CTA")])
            .with_selected(SelectedElement::new("#hero", "section"))
            .with_screenshot("data:image/png;base64,AAAA");
        assert_eq!(request.variation_specs.len(), 1);
        assert_eq!(request.selected_element.unwrap().selector, "#hero");
        assert!(request.page_data.screenshot.is_some());
    }

    #[test]
    fn test_page_data_accepts_element_database_alias() {
        let data: PageData = serde_json::from_value(serde_json::json!({
            "elementDatabase": {"elements": [{"selector": "#x"}]}
        }))
        .unwrap();
        assert_eq!(data.database.len(), 1);
    }
}
