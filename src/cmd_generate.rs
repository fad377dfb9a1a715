//! Model-facing commands: prompt, generate, adjust, qa.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use variantsmith_config::{Config, Stage};
use variantsmith_pipeline::qa::feedback_for_adjustment;
use variantsmith_pipeline::{
    GenerationOutcome, GenerationSession, PipelineContext, PromptBuilder, ProviderGateway,
    VisualQaEvaluator,
};
use variantsmith_protocols::{
    ElementDatabase, GeneratedCode, GenerationRequest, GenerationSettings, SelectedElement,
    TestExecutionResult, VariationSpec,
};

use crate::adapters::{DetachedSandbox, FilePageCapture, load_capture};
use crate::cli::RequestArgs;
use crate::providers::DefaultProviderFactory;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// "Name: description" → variation spec; a bare name gets an empty description.
pub(crate) fn parse_variation(spec: &str) -> VariationSpec {
    match spec.split_once(':') {
        Some((name, description)) => VariationSpec::new(name.trim(), description.trim()),
        None => VariationSpec::new(spec.trim(), ""),
    }
}

fn selected_element(database: &ElementDatabase, selector: &str) -> SelectedElement {
    match database.find(selector) {
        Some(record) => {
            let mut selected = SelectedElement::new(selector, record.tag.clone());
            selected.text = record.text.clone();
            selected.classes = record.classes.clone();
            selected
        }
        None => {
            warn!(selector, "Selected element is not in the captured page");
            SelectedElement::new(selector, "")
        }
    }
}

fn context(config: Config, page: &Path) -> Arc<PipelineContext> {
    Arc::new(PipelineContext::new(
        config,
        Arc::new(DefaultProviderFactory::new()),
        Arc::new(FilePageCapture::new(page)),
        Arc::new(DetachedSandbox),
    ))
}

fn write_code(output: Option<&PathBuf>, outcome: &GenerationOutcome) -> anyhow::Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&outcome.code)?)?;
        info!("Wrote code to {}", path.display());
    }
    Ok(())
}

fn report(outcome: &GenerationOutcome) {
    if outcome.is_empty() {
        warn!("No variations could be recovered from the model reply");
    }
    for warning in &outcome.warnings {
        warn!("{}", warning.message);
    }
    for violation in &outcome.violations {
        warn!(
            selector = %violation.selector,
            restored = violation.restored,
            "Adjustment dropped existing code"
        );
    }
}

pub(crate) fn prompt(config: &Config, args: &RequestArgs, description: &str) -> anyhow::Result<()> {
    let captured = load_capture(&args.page)?;
    let generation = &config.generation;

    let selected = args
        .selected
        .as_deref()
        .map(|selector| selected_element(&captured.database, selector));
    let mut request = GenerationRequest::new(captured.database, description)
        .with_variations(args.variations.iter().map(|v| parse_variation(v)).collect());
    request.selected_element = selected;
    request.settings = GenerationSettings {
        text_limit: generation.text_limit,
        max_elements: generation.max_elements,
        attach_screenshot: generation.attach_screenshot,
    };

    println!("{}", PromptBuilder::new().build(&request, None));
    Ok(())
}

pub(crate) async fn generate(
    config: Config,
    args: &RequestArgs,
    description: &str,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let mut session = GenerationSession::new(context(config, &args.page), args.url.clone());
    let database = session.capture(false).await?;
    let selected = args
        .selected
        .as_deref()
        .map(|selector| selected_element(&database, selector));
    let specs = args.variations.iter().map(|v| parse_variation(v)).collect();

    let outcome = session.generate(description, specs, selected).await?;
    report(&outcome);
    write_code(output, &outcome)?;
    print_json(&outcome)
}

pub(crate) async fn adjust(
    config: Config,
    args: &RequestArgs,
    code: &Path,
    feedback: &str,
    test_result: Option<&PathBuf>,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let previous: GeneratedCode = read_json(code)?;
    let mut session = GenerationSession::new(context(config, &args.page), args.url.clone());
    session.capture(false).await?;
    session.resume(previous, "previously applied code");
    if let Some(path) = test_result {
        session.set_test_result(read_json::<TestExecutionResult>(path)?);
    }

    let outcome = session.adjust(feedback).await?;
    report(&outcome);
    write_code(output, &outcome)?;
    print_json(&outcome)
}

/// Image argument: `@path` reads the data URL or image URL from a file.
fn image_arg(value: &str) -> anyhow::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => Ok(std::fs::read_to_string(path)?.trim().to_string()),
        None => Ok(value.to_string()),
    }
}

pub(crate) async fn qa(
    config: &Config,
    before: &str,
    after: &str,
    request: &str,
    code: &Path,
    test_result: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let code: GeneratedCode = read_json(code)?;
    let test_result = test_result
        .map(|path| read_json::<TestExecutionResult>(path))
        .transpose()?;
    let settings = config.resolve_provider(Stage::VisualQa)?;

    let gateway = ProviderGateway::from_config(Arc::new(DefaultProviderFactory::new()), &config.gateway);
    let verdict = VisualQaEvaluator::new(gateway)
        .evaluate(
            &image_arg(before)?,
            &image_arg(after)?,
            request,
            &code,
            test_result.as_ref(),
            &settings,
        )
        .await?;

    print_json(&verdict)?;
    if let Some(feedback) = feedback_for_adjustment(&verdict) {
        println!("\n{}", feedback);
    }
    Ok(())
}
