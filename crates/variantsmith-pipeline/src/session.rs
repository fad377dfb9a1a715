//! Session orchestration.
//!
//! A [`GenerationSession`] owns the state of one target page: the captured
//! element database, the code currently applied, the conversation log and
//! the last test result. Independent sessions share only the
//! [`PipelineContext`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};
use uuid::Uuid;
use variantsmith_config::{Config, Stage};
use variantsmith_protocols::{
    ConversationTurn, ElementDatabase, ExtractionMode, GeneratedCode, GenerationRequest,
    GenerationSettings, PageCapture, PageSandbox, PipelineError, ProviderSettings, QaVerdict,
    SelectedElement, TestExecutionResult, TestRunReport, VariationSpec,
};

use crate::adjust::{AdjustmentEngine, ConversationLog};
use crate::cache::ElementDatabaseCache;
use crate::feedback::summarize_test_result;
use crate::gateway::{ProviderFactory, ProviderGateway};
use crate::harness::{RetryPolicy, TestRunner};
use crate::outcome::GenerationOutcome;
use crate::page::PageOperations;
use crate::prompt::{PromptBuilder, SYSTEM_PROMPT};
use crate::qa::VisualQaEvaluator;
use crate::tracker::{RequestTicket, RequestTracker};

/// Services shared by every session.
pub struct PipelineContext {
    pub config: Arc<Config>,
    pub gateway: ProviderGateway,
    pub page: PageOperations,
    pub cache: Arc<ElementDatabaseCache>,
    pub tracker: Arc<RequestTracker>,
}

impl PipelineContext {
    pub fn new(
        config: Config,
        factory: Arc<dyn ProviderFactory>,
        capture: Arc<dyn PageCapture>,
        sandbox: Arc<dyn PageSandbox>,
    ) -> Self {
        Self {
            gateway: ProviderGateway::from_config(factory, &config.gateway),
            page: PageOperations::from_config(capture, sandbox, &config.page),
            cache: Arc::new(ElementDatabaseCache::from_config(&config.cache)),
            tracker: Arc::new(RequestTracker::new()),
            config: Arc::new(config),
        }
    }

    /// Provider settings for one turn, resolved once.
    pub fn settings(&self, stage: Stage) -> Result<ProviderSettings, PipelineError> {
        self.config
            .resolve_provider(stage)
            .map_err(|e| PipelineError::Configuration(e.to_string()))
    }

    fn generation_settings(&self) -> GenerationSettings {
        let generation = &self.config.generation;
        GenerationSettings {
            text_limit: generation.text_limit,
            max_elements: generation.max_elements,
            attach_screenshot: generation.attach_screenshot,
        }
    }
}

pub struct GenerationSession {
    id: Uuid,
    target: String,
    context: Arc<PipelineContext>,
    log: ConversationLog,
    database: Option<Arc<ElementDatabase>>,
    screenshot: Option<String>,
    current: Option<GeneratedCode>,
    last_request: Option<GenerationRequest>,
    last_test: Option<TestExecutionResult>,
}

impl GenerationSession {
    pub fn new(context: Arc<PipelineContext>, target: impl Into<String>) -> Self {
        let log = ConversationLog::new(context.config.adjustment.max_history_turns);
        Self {
            id: Uuid::new_v4(),
            target: target.into(),
            context,
            log,
            database: None,
            screenshot: None,
            current: None,
            last_request: None,
            last_test: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn database(&self) -> Option<&ElementDatabase> {
        self.database.as_deref()
    }

    /// Code currently applied to the page, if any.
    pub fn current_code(&self) -> Option<&GeneratedCode> {
        self.current.as_ref()
    }

    pub fn last_test(&self) -> Option<&TestExecutionResult> {
        self.last_test.as_ref()
    }

    /// Capture the element database, serving recent captures from the cache
    /// unless `refresh` is set.
    #[instrument(skip(self), fields(session = %self.id, page = %self.target))]
    pub async fn capture(&mut self, refresh: bool) -> Result<Arc<ElementDatabase>, PipelineError> {
        if !refresh {
            if let Some(page) = self.context.cache.get(&self.target, ExtractionMode::Full) {
                self.database = Some(page.database.clone());
                if page.screenshot.is_some() {
                    self.screenshot = page.screenshot;
                }
                return Ok(page.database);
            }
        }

        let ticket = self.context.tracker.begin(&self.target);
        let captured = self.context.page.capture(&self.target).await?;
        self.context.tracker.ensure_current(&ticket)?;

        info!(elements = captured.database.len(), "Captured element database");
        let page = self.context.cache.insert(
            &self.target,
            ExtractionMode::Full,
            captured.database,
            captured.screenshot,
        );
        self.database = Some(page.database.clone());
        if page.screenshot.is_some() {
            self.screenshot = page.screenshot;
        }
        Ok(page.database)
    }

    /// Use an already captured page instead of the capture service.
    pub fn set_page(&mut self, database: ElementDatabase, screenshot: Option<String>) {
        self.database = Some(Arc::new(database));
        self.screenshot = screenshot;
    }

    /// Continue from code already applied to the page, e.g. saved by an
    /// earlier run.
    pub fn resume(&mut self, code: GeneratedCode, description: &str) {
        self.log.push(ConversationTurn::new(description, code.clone()));
        self.current = Some(code);
    }

    /// Record a test result produced outside this session.
    pub fn set_test_result(&mut self, result: TestExecutionResult) {
        self.last_test = Some(result);
    }

    fn request(&self, description: &str) -> Result<GenerationRequest, PipelineError> {
        let database = self.database.as_deref().ok_or_else(|| {
            PipelineError::Configuration(format!("no element database captured for '{}'", self.target))
        })?;
        let mut request = GenerationRequest::new(database.clone(), description);
        request.settings = self.context.generation_settings();
        if let Some(screenshot) = &self.screenshot {
            request = request.with_screenshot(screenshot.clone());
        }
        Ok(request)
    }

    fn begin(&self) -> RequestTicket {
        self.context.tracker.begin(&self.target)
    }

    fn record(&mut self, request: GenerationRequest, outcome: &GenerationOutcome) {
        if outcome.is_empty() {
            warn!(session = %self.id, "Turn produced no code; keeping the previous code");
        } else {
            self.current = Some(outcome.code.clone());
            self.log
                .push(ConversationTurn::new(request.description.clone(), outcome.code.clone()));
        }
        self.last_request = Some(request);
    }

    /// Initial generation for a natural-language request.
    #[instrument(skip_all, fields(session = %self.id, page = %self.target))]
    pub async fn generate(
        &mut self,
        description: &str,
        variation_specs: Vec<VariationSpec>,
        selected: Option<SelectedElement>,
    ) -> Result<GenerationOutcome, PipelineError> {
        let ticket = self.begin();
        let settings = self.context.settings(Stage::Generation)?;
        let mut request = self.request(description)?.with_variations(variation_specs);
        request.selected_element = selected;

        let builder = PromptBuilder::new();
        let reply = self
            .context
            .gateway
            .call_model(SYSTEM_PROMPT, builder.messages(&request, None), &settings)
            .await?;
        self.context.tracker.ensure_current(&ticket)?;

        let outcome = GenerationOutcome::from_reply(&reply, &request.page_data.database);
        info!(
            variations = outcome.code.variations.len(),
            warnings = outcome.warnings.len(),
            repairs = outcome.repairs.len(),
            "Generation turn completed"
        );
        self.record(request, &outcome);
        Ok(outcome)
    }

    /// Adjustment turn on top of the current code.
    ///
    /// The last test result, if any, is folded in as mandatory fixes and
    /// consumed.
    #[instrument(skip_all, fields(session = %self.id, page = %self.target))]
    pub async fn adjust(&mut self, feedback: &str) -> Result<GenerationOutcome, PipelineError> {
        let ticket = self.begin();
        let settings = self.context.settings(Stage::Adjustment)?;

        let mut request = match &self.last_request {
            Some(previous) => previous.clone(),
            None => self.request(feedback)?,
        };
        request.description = feedback.to_string();
        if let Some(database) = &self.database {
            request.page_data.database = database.as_ref().clone();
        }

        let test_summary = self.last_test.as_ref().map(summarize_test_result);
        let engine = AdjustmentEngine::new(
            self.context.gateway.clone(),
            self.context.config.adjustment.enforce_additive,
        );
        let outcome = engine
            .adjust(
                &request,
                self.current.as_ref(),
                test_summary.as_deref(),
                Some(&self.log),
                &settings,
            )
            .await?;
        self.context.tracker.ensure_current(&ticket)?;

        self.last_test = None;
        self.record(request, &outcome);
        Ok(outcome)
    }

    /// Inject one variation of the current code into the page. Returns
    /// `false` when there is no such variation.
    pub async fn apply(&self, variation: u32) -> Result<bool, PipelineError> {
        let Some(payload) = self.current.as_ref().and_then(|code| code.payload_for(variation)) else {
            warn!(session = %self.id, variation, "Nothing to apply");
            return Ok(false);
        };
        self.context.page.apply(&self.target, &payload).await?;
        info!(session = %self.id, variation, "Applied variation");
        Ok(true)
    }

    pub async fn screenshot(&self) -> Result<String, PipelineError> {
        self.context.page.screenshot(&self.target).await
    }

    /// Run a behavioral test against the page and remember its result for
    /// the next adjustment turn.
    pub async fn run_test(
        &mut self,
        test_source: &str,
        timeout: Option<Duration>,
    ) -> Result<TestRunReport, PipelineError> {
        let runner = TestRunner::new(
            self.context.page.sandbox(),
            RetryPolicy::from_config(&self.context.config.harness),
        );
        let report = runner.run(&self.target, test_source, timeout).await?;
        self.last_test = Some(report.result.clone());
        Ok(report)
    }

    /// Visual QA of the current code against the latest request.
    pub async fn evaluate(&self, before_image: &str, after_image: &str) -> Result<QaVerdict, PipelineError> {
        let settings = self.context.settings(Stage::VisualQa)?;
        let request = self.log.last().map(|t| t.request.as_str()).unwrap_or_default();
        let empty = GeneratedCode::default();
        let code = self.current.as_ref().unwrap_or(&empty);

        let evaluator = VisualQaEvaluator::new(self.context.gateway.clone());
        let verdict = evaluator
            .evaluate(
                before_image,
                after_image,
                request,
                code,
                self.last_test.as_ref(),
                &settings,
            )
            .await?;
        Ok(verdict)
    }
}
