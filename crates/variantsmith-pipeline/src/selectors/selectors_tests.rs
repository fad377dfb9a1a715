use super::*;
use variantsmith_protocols::{ElementRecord, Variation};

fn database() -> ElementDatabase {
    ElementDatabase::from_elements(
        "https://example.com",
        vec![
            ElementRecord::new("#cta", "button")
                .with_text("Get Started")
                .with_classes(["btn", "btn-primary"])
                .with_alternates(["button.btn-primary"]),
            ElementRecord::new("#hero-h1", "h1").with_text("Welcome"),
            ElementRecord::new("nav a", "a"),
            ElementRecord::new("ul.plans > li:nth-of-type(2)", "li").with_classes(["plan", "plan-featured"]),
            ElementRecord::new("#card-1", "div").with_classes(["card"]),
            ElementRecord::new("#card-2", "div").with_classes(["card"]),
        ],
    )
}

fn code(css: &str, js: &str) -> GeneratedCode {
    GeneratedCode::new(vec![Variation::new(1, "V1").with_css(css).with_js(js)])
}

#[test]
fn test_known_selectors_produce_no_warnings() {
    let code = code(
        "#cta:hover { background: green; }\nnav a { color: red; }\nbutton.btn-primary { padding: 0; }",
        "waitForElement('#hero-h1').then(el => el.remove());",
    );
    assert!(validate(&code, &database()).is_empty());
}

#[test]
fn test_unknown_selector_one_warning_per_kind() {
    let mut code = code(
        ".hero-title { color: red; }\n.hero-title:hover { color: blue; }",
        "waitForElement('.hero-title'); waitForElement('.hero-title');",
    );
    code.variations.push(Variation::new(2, "V2").with_css(".hero-title { color: green; }"));
    let warnings = validate(&code, &database());
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].kind, CodeKind::Css);
    assert_eq!(warnings[0].location, CodeLocation::Variation(1));
    assert_eq!(warnings[1].kind, CodeKind::Js);
    assert!(warnings[0].message.contains(".hero-title"));
}

#[test]
fn test_repair_rewrites_css_and_js() {
    let mut code = code(
        ".btn { background: green; }\n.btn:hover { opacity: .9; }",
        "waitForElement('.btn').then(el => { el.textContent = 'Go'; });",
    );
    let report = repair(&mut code, &database());
    assert_eq!(
        report.repairs,
        vec![SelectorRepair {
            from: ".btn".to_string(),
            to: "#cta".to_string()
        }]
    );
    assert!(report.is_clean());
    let v = &code.variations[0];
    assert!(v.css.contains("#cta { background: green; }"));
    assert!(v.css.contains("#cta:hover"));
    assert!(v.js.contains("waitForElement('#cta')"));
}

#[test]
fn test_repair_uses_positional_selector() {
    let mut code = code("li.plan-featured { border: 2px solid gold; }", "");
    let report = repair(&mut code, &database());
    assert_eq!(report.repairs[0].to, "ul.plans > li:nth-of-type(2)");
    assert!(code.variations[0].css.starts_with("ul.plans > li:nth-of-type(2) {"));
}

#[test]
fn test_ambiguous_generic_is_not_repaired() {
    let mut code = code(".card { box-shadow: none; }", "");
    let report = repair(&mut code, &database());
    assert!(report.repairs.is_empty());
    assert_eq!(report.unrepairable.len(), 1);
    assert_eq!(code.variations[0].css, ".card { box-shadow: none; }");
}

#[test]
fn test_descendant_selector_is_not_repaired() {
    let mut code = code(".hero .btn { color: red; }", "");
    let report = repair(&mut code, &database());
    assert!(report.repairs.is_empty());
    assert_eq!(report.unrepairable[0].selector, ".hero .btn");
}

#[test]
fn test_repair_never_touches_longer_class_names() {
    let (out, count) = repair::replace_selector(".btn-primary, .btn { x: y }", ".btn", "#cta");
    assert_eq!(count, 1);
    assert_eq!(out, ".btn-primary, #cta { x: y }");
}

#[test]
fn test_repair_is_idempotent() {
    let mut once = code(
        ".btn { color: red; }\nli.plan-featured { border: 0; }\n.unknown { x: y; }",
        "waitForElement('.btn');",
    );
    repair(&mut once, &database());
    let mut twice = once.clone();
    let second = repair(&mut twice, &database());
    assert_eq!(once, twice);
    assert!(second.repairs.is_empty());
    assert_eq!(second.unrepairable.len(), 1);
}

#[test]
fn test_replace_skips_text_already_in_target_form() {
    let (out, count) = repair::replace_selector(
        ".plans .plan:first-child { a: b }\n.plan { c: d }",
        ".plan",
        ".plans .plan:first-child",
    );
    assert_eq!(count, 1);
    assert_eq!(out, ".plans .plan:first-child { a: b }\n.plans .plan:first-child { c: d }");
}
