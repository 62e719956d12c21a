//! Main Guard implementation

use crate::analyzer::AnalyzerEngine;
use crate::audit::AuditLogger;
use crate::config::{AuditConfig, EngineConfig, GuardConfig, GuardrailConfig, PipelineConfig};
use crate::error::{PiiError, Result};
use crate::pipeline::Pipeline;
use crate::request::{self, InputGuardrailRequest, OutputGuardrailRequest};
use crate::types::{ChatMessage, Direction, GuardContext, GuardrailDecision, RedactionResult};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// PII guardrail for chat-completion traffic
///
/// Guard resolves the per-request recognizer selection, redacts every
/// message of the conversation and audits each decision.
pub struct Guard {
    config: GuardConfig,
    pipeline: Pipeline,
    audit_logger: AuditLogger,
}

impl Default for Guard {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

impl Guard {
    /// Create a new Guard with its own analysis engine
    pub fn new(config: GuardConfig) -> Self {
        let engine = Arc::new(AnalyzerEngine::new(config.engine.clone()));
        Self::with_engine(config, engine)
    }

    /// Create a Guard sharing an existing analysis engine
    pub fn with_engine(config: GuardConfig, engine: Arc<AnalyzerEngine>) -> Self {
        Self {
            pipeline: Pipeline::new(engine),
            audit_logger: AuditLogger::new(config.audit.clone()),
            config,
        }
    }

    /// Set the deadline for one guardrail decision
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Deadline for one guardrail decision
    pub fn timeout(&self) -> Option<Duration> {
        self.config.timeout_ms.map(Duration::from_millis)
    }

    /// The analysis engine
    pub fn engine(&self) -> &Arc<AnalyzerEngine> {
        self.pipeline.engine()
    }

    /// Process a conversation flowing in `direction`
    pub async fn process_messages(
        &self,
        messages: &[ChatMessage],
        config: &GuardrailConfig,
        direction: Direction,
        context: &GuardContext,
    ) -> Result<GuardrailDecision> {
        let pipeline_config = config.for_direction(direction);
        let content = audit_content(messages);

        if !pipeline_config.enabled {
            debug!(direction = %direction, "Guardrail disabled for direction");
            self.audit_logger.log_skipped(context, direction, &content);
            return Ok(GuardrailDecision::PassThrough);
        }

        let start = Instant::now();
        let outcome = with_deadline(
            self.timeout(),
            self.pipeline.process(messages, &pipeline_config),
        )
        .await;

        if let Err(e) = &outcome {
            if e.is_internal() {
                error!(direction = %direction, error = %e, "Guardrail processing failed");
            }
        }
        self.audit_logger.log(
            context,
            direction,
            &content,
            outcome.as_ref(),
            start.elapsed().as_millis() as u64,
        );

        outcome
    }

    /// Process an input guardrail request.
    ///
    /// Returns the request body with its messages replaced, or `None` when
    /// the body should be forwarded unchanged.
    pub async fn process_input(&self, request: &InputGuardrailRequest) -> Result<Option<Value>> {
        let messages = request.messages()?;
        let context = request.context.guard_context();

        let decision = self
            .process_messages(&messages, &request.config, Direction::Input, &context)
            .await?;

        match decision {
            GuardrailDecision::PassThrough => Ok(None),
            GuardrailDecision::Transformed(messages) => {
                Ok(Some(request::with_messages(&request.request_body, &messages)?))
            }
        }
    }

    /// Process an output guardrail request.
    ///
    /// Returns the completion with each choice's content redacted, or `None`
    /// when the completion should be returned unchanged.
    pub async fn process_output(&self, request: &OutputGuardrailRequest) -> Result<Option<Value>> {
        let messages = request.choice_messages()?;
        let context = request.context.guard_context();

        let decision = self
            .process_messages(&messages, &request.config, Direction::Output, &context)
            .await?;

        match decision {
            GuardrailDecision::PassThrough => Ok(None),
            GuardrailDecision::Transformed(messages) => Ok(Some(request::with_choice_messages(
                &request.response_body,
                &messages,
            )?)),
        }
    }

    /// Redact a single text
    pub async fn redact_text(&self, text: &str, config: &PipelineConfig) -> Result<RedactionResult> {
        with_deadline(self.timeout(), self.pipeline.redact_text(text, config)).await
    }

    /// Build the default recognizer set ahead of the first request
    pub async fn preload(&self) -> Result<()> {
        self.engine().preload().await?;
        Ok(())
    }

    /// Create a builder for Guard
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }
}

/// Run `fut`, failing with [`PiiError::Timeout`] once `limit` elapses
pub async fn with_deadline<T>(
    limit: Option<Duration>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| PiiError::Timeout(limit))?,
        None => fut.await,
    }
}

fn audit_content(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .flat_map(ChatMessage::texts)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builder for Guard configuration
pub struct GuardBuilder {
    config: GuardConfig,
    engine: Option<Arc<AnalyzerEngine>>,
}

impl GuardBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: GuardConfig::default(),
            engine: None,
        }
    }

    /// Configure the analysis engine
    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.config.engine = config;
        self
    }

    /// Configure audit logging
    pub fn with_audit(mut self, config: AuditConfig) -> Self {
        self.config.audit = config;
        self
    }

    /// Set the deadline for one guardrail decision
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Share an existing analysis engine (and its cache)
    pub fn with_engine(mut self, engine: Arc<AnalyzerEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Use the process-wide analysis engine
    pub fn shared_engine(self) -> Self {
        self.with_engine(AnalyzerEngine::global())
    }

    /// Build the Guard
    pub fn build(self) -> Guard {
        match self.engine {
            Some(engine) => {
                let mut config = self.config;
                config.engine = engine.config().clone();
                Guard::with_engine(config, engine)
            }
            None => Guard::new(self.config),
        }
    }
}

impl Default for GuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
