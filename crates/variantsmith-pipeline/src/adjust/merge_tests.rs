use super::*;
use variantsmith_protocols::Variation;

fn single(css: &str, js: &str) -> GeneratedCode {
    GeneratedCode::new(vec![Variation::new(1, "V1").with_css(css).with_js(js)])
}

#[test]
fn test_dropped_declaration_is_restored() {
    let previous = single("#cta{background:red}", "");
    let mut next = single("#cta { font-size: 20px; }", "");

    let violations = enforce_additive(&previous, &mut next);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].selector, "#cta");
    assert_eq!(violations[0].dropped, vec!["background: red"]);
    assert!(violations[0].restored);

    let css = &next.variations[0].css;
    assert!(css.contains("font-size: 20px"));
    assert!(css.contains("#cta { background: red; }"));
}

#[test]
fn test_merged_output_has_no_violation() {
    let previous = single("#cta{background:red}", "");
    let next = single("#cta { background: red; font-size: 20px; }", "");
    assert!(check_additive(&previous, &next).is_empty());
}

#[test]
fn test_changed_value_is_not_a_violation() {
    let previous = single("#cta{background:red}", "");
    let next = single("#cta{background:blue}", "");
    assert!(check_additive(&previous, &next).is_empty());
}

#[test]
fn test_check_does_not_modify() {
    let previous = single("#cta{background:red}\nnav a{color:white}", "");
    let next = single("#cta{background:red}", "");
    let before = next.clone();
    let violations = check_additive(&previous, &next);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].selector, "nav a");
    assert!(!violations[0].restored);
    assert_eq!(next, before);
}

#[test]
fn test_media_context_is_kept() {
    let previous = single("@media (max-width: 600px) { #cta { display: block; } }", "");
    let mut next = single("#cta { color: white; }", "");
    enforce_additive(&previous, &mut next);
    assert!(next.variations[0]
        .css
        .contains("@media (max-width: 600px) {\n  #cta { display: block; }\n}"));
}

#[test]
fn test_dropped_js_statement_is_restored() {
    let previous = single(
        "",
        "waitForElement('#cta').then(el => { el.textContent = 'Start Free Trial'; });",
    );
    let mut next = single("", "waitForElement('#hero-h1').then(el => { el.style.fontSize = '48px'; });");

    let violations = enforce_additive(&previous, &mut next);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, CodeKind::Js);
    assert_eq!(violations[0].selector, "#cta");
    assert!(next.variations[0].js.contains("Start Free Trial"));
    assert!(next.variations[0].js.contains("fontSize"));
}

#[test]
fn test_rewritten_js_still_referencing_selector_is_fine() {
    let previous = single("", "document.querySelector('#cta').textContent = 'Go';");
    let next = single(
        "",
        "waitForElement('#cta').then(el => { el.textContent = 'Go'; el.style.fontWeight = '700'; });",
    );
    assert!(check_additive(&previous, &next).is_empty());
}

#[test]
fn test_missing_variation_is_restored_in_order() {
    let previous = GeneratedCode::new(vec![
        Variation::new(1, "Green").with_css("#cta{background:green}"),
        Variation::new(2, "Bold").with_css("#hero-h1{font-weight:800}"),
    ]);
    let mut next = GeneratedCode::new(vec![
        Variation::new(1, "Green").with_css("#cta{background:green;font-size:18px}"),
    ]);

    let violations = enforce_additive(&previous, &mut next);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].location, CodeLocation::Variation(2));
    assert_eq!(next.variations.len(), 2);
    assert_eq!(next.variations[1].name, "Bold");
}

#[test]
fn test_global_css_is_compared() {
    let mut previous = single("", "");
    previous.global_css = "body { margin: 0; }".to_string();
    let mut next = single("#cta{color:red}", "");
    let violations = enforce_additive(&previous, &mut next);
    assert_eq!(violations[0].location, CodeLocation::Global);
    assert_eq!(next.global_css, "body { margin: 0; }");
}

#[test]
fn test_top_level_statements() {
    let js = "// note\nconst a = 1;\nwaitForElement('#cta').then(el => {\n  el.textContent = 'a;b';\n});\nif (a) { x(); } else { y(); }\nfunction f() { return '}'; }\nlast()";
    let statements = top_level_statements(js);
    assert_eq!(
        statements,
        vec![
            "const a = 1;",
            "waitForElement('#cta').then(el => {\n  el.textContent = 'a;b';\n});",
            "if (a) { x(); } else { y(); }",
            "function f() { return '}'; }",
            "last()",
        ]
    );
}
