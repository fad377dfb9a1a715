//! A single captured page element.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How central an element is to the capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementLevel {
    /// Directly interactive or explicitly targeted.
    #[default]
    Primary,
    /// Near a primary element.
    Proximity,
    /// Layout/structural container.
    Structure,
}

/// Visual summary of an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// One element of the captured database.
///
/// `selector` resolved to at least one live node when captured; the pipeline
/// never invents selectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub selector: String,

    #[serde(default)]
    pub tag: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub level: ElementLevel,

    #[serde(default)]
    pub visual: VisualInfo,

    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Other selectors that also resolve to this element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<String>,

    /// Selectors of the containing elements, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Outer HTML excerpt, when the capture kept one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl ElementRecord {
    pub fn new(selector: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_level(mut self, level: ElementLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_ancestors<I, S>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_alternates<I, S>(mut self, alternates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternates = alternates.into_iter().map(Into::into).collect();
        self
    }

    /// The primary selector followed by declared alternates.
    pub fn all_selectors(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.selector.as_str()).chain(self.alternates.iter().map(String::as_str))
    }

    /// Whether this element sits inside the element identified by `scope`.
    pub fn is_within(&self, scope: &str) -> bool {
        if self.selector == scope || self.alternates.iter().any(|a| a == scope) {
            return true;
        }
        if self.ancestors.iter().any(|a| a == scope) {
            return true;
        }
        let descendant = format!("{} ", scope);
        self.selector.starts_with(&descendant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_record() {
        let record: ElementRecord = serde_json::from_str(r#"{"selector":"nav a"}"#).unwrap();
        assert_eq!(record.selector, "nav a");
        assert_eq!(record.level, ElementLevel::Primary);
        assert!(record.classes.is_empty());
    }

    #[test]
    fn test_deserialize_full_record() {
        let record: ElementRecord = serde_json::from_value(serde_json::json!({
            "selector": "#cta",
            "tag": "button",
            "text": "Get Started",
            "level": "proximity",
            "visual": {"bg": "rgb(0,0,255)", "color": "#fff", "width": 120.0, "height": 40.0},
            "classes": ["btn", "btn-primary"],
            "id": "cta",
            "section": "hero",
            "alternates": ["button.btn-primary"]
        }))
        .unwrap();
        assert_eq!(record.level, ElementLevel::Proximity);
        assert_eq!(record.visual.width, Some(120.0));
        assert_eq!(record.all_selectors().collect::<Vec<_>>(), vec!["#cta", "button.btn-primary"]);
    }

    #[test]
    fn test_is_within_by_ancestor() {
        let record = ElementRecord::new("#hero .title", "h1").with_ancestors(["body", "#hero"]);
        assert!(record.is_within("#hero"));
        assert!(!record.is_within("#footer"));
    }

    #[test]
    fn test_is_within_by_descendant_selector() {
        let record = ElementRecord::new("#pricing .plan", "div");
        assert!(record.is_within("#pricing"));
        assert!(!record.is_within("#pric"));
    }

    #[test]
    fn test_is_within_self() {
        let record = ElementRecord::new("#cta", "button");
        assert!(record.is_within("#cta"));
    }
}
