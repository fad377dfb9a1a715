//! Offline commands: parse, validate, harness, check.

use std::path::Path;

use serde_json::json;

use variantsmith_config::{Config, ConfigValidator};
use variantsmith_pipeline::{ResponseParser, TestHarnessBuilder, selectors};
use variantsmith_protocols::GeneratedCode;

use crate::adapters::load_capture;
use crate::cmd_generate::{print_json, read_json};

pub(crate) fn parse(file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)?;
    print_json(&ResponseParser::parse(&raw))
}

pub(crate) fn validate(code: &Path, page: &Path, repair: bool) -> anyhow::Result<()> {
    let database = load_capture(page)?.database;
    let mut code: GeneratedCode = read_json(code)?;

    if repair {
        let report = selectors::repair(&mut code, &database);
        print_json(&json!({
            "repairs": report.repairs,
            "warnings": report.unrepairable,
            "code": code,
        }))
    } else {
        let warnings = selectors::validate(&code, &database);
        print_json(&json!({ "warnings": warnings }))
    }
}

pub(crate) fn harness(test: &Path) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(test)?;
    println!("{}", TestHarnessBuilder::build(&source));
    Ok(())
}

pub(crate) fn check(config: &Config) -> anyhow::Result<()> {
    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !result.is_valid() {
        anyhow::bail!("configuration has {} error(s)", result.errors.len());
    }
    println!("Configuration OK");
    Ok(())
}
