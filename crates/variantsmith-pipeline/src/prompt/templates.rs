pub const SYSTEM_PROMPT: &str = "You are an expert conversion-rate-optimization engineer who writes \
production-ready CSS and JavaScript for A/B test variations. You only target elements through the \
verified selectors you are given, you never invent selectors, and you always answer with a single \
JSON object in the exact format requested.";

pub const OUTPUT_FORMAT: &str = r##"## OUTPUT FORMAT (MANDATORY)
Respond with ONE JSON object and nothing else: no prose, no markdown fences.
The object MUST have exactly this shape:
- "variations": array with one entry per requested variation, each {"number", "name", "css", "js"}
- "globalCSS": CSS shared by every variation (empty string if none)
- "globalJS": JavaScript shared by every variation (empty string if none)
Use waitForElement(selector) in JavaScript before touching an element.

Example:
{
  "variations": [
    {
      "number": 1,
      "name": "Green CTA",
      "css": "#cta { background-color: #16a34a !important; color: #ffffff !important; }",
      "js": "waitForElement('#cta').then(function (el) { el.textContent = 'Start Free Trial'; });"
    }
  ],
  "globalCSS": "",
  "globalJS": ""
}"##;

pub(crate) const SCOPE_KEYWORDS: &[&str] = &[
    "section",
    "container",
    "background",
    "this area",
    "whole",
    "entire",
    "wrapper",
    "layout",
    "spacing",
    "padding",
    "margin",
    "border",
];
