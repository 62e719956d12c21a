//! Guardrail request pipeline
//!
//! Runs analysis and redaction over every message of a conversation and
//! decides between passing it through untouched and returning the rebuilt
//! conversation.

use crate::analyzer::{AnalyzerEngine, RecognizerSet};
use crate::config::PipelineConfig;
use crate::error::{PiiError, Result};
use crate::redactor;
use crate::resolver::{self, ResolvedRecognizers};
use crate::types::{ChatMessage, GuardrailDecision, RedactionResult};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// Conversation-level PII pipeline
#[derive(Clone)]
pub struct Pipeline {
    engine: Arc<AnalyzerEngine>,
}

impl Pipeline {
    /// Create a pipeline backed by `engine`
    pub fn new(engine: Arc<AnalyzerEngine>) -> Self {
        Self { engine }
    }

    /// The analysis engine
    pub fn engine(&self) -> &Arc<AnalyzerEngine> {
        &self.engine
    }

    /// Resolve the recognizer selection of `config`
    pub fn resolve(&self, config: &PipelineConfig) -> Result<ResolvedRecognizers> {
        resolver::resolve_config(config, self.engine.config())
    }

    /// Process a conversation.
    ///
    /// Returns [`GuardrailDecision::PassThrough`] when the pipeline is
    /// disabled or no message changed.
    pub async fn process(
        &self,
        messages: &[ChatMessage],
        config: &PipelineConfig,
    ) -> Result<GuardrailDecision> {
        if !config.enabled {
            debug!("PII pipeline disabled, passing through");
            return Ok(GuardrailDecision::PassThrough);
        }

        let resolved = self.resolve(config)?;
        let set = self.engine.recognizer_set(&resolved.ids).await?;
        let threshold = self.engine.config().score_threshold;

        let tasks = messages.iter().cloned().map(|message| {
            let set = set.clone();
            let language = resolved.language.clone();
            async move {
                if !message.has_text() {
                    return Ok::<_, PiiError>((message, false));
                }
                let texts: Vec<String> = message.texts().into_iter().map(str::to_string).collect();
                let results = tokio::task::spawn_blocking(move || {
                    texts
                        .iter()
                        .map(|text| analyze_and_redact(&set, text, &language, threshold))
                        .collect::<Result<Vec<_>>>()
                })
                .await??;

                let changed = results.iter().any(|r| r.changed);
                let mut message = message;
                if changed {
                    if let Some(content) = message.content.as_mut() {
                        for (slot, result) in content.texts_mut().into_iter().zip(results) {
                            *slot = result.redacted_text;
                        }
                    }
                }
                Ok((message, changed))
            }
        });

        let processed = try_join_all(tasks).await?;
        let changed = processed.iter().filter(|(_, changed)| *changed).count();

        if changed == 0 {
            debug!(messages = processed.len(), "No PII found, passing through");
            return Ok(GuardrailDecision::PassThrough);
        }

        info!(
            messages = processed.len(),
            redacted = changed,
            "Conversation transformed"
        );
        Ok(GuardrailDecision::Transformed(
            processed.into_iter().map(|(message, _)| message).collect(),
        ))
    }

    /// Analyze and redact a single text
    pub async fn redact_text(&self, text: &str, config: &PipelineConfig) -> Result<RedactionResult> {
        if !config.enabled || text.is_empty() {
            return Ok(RedactionResult {
                redacted_text: text.to_string(),
                changed: false,
            });
        }

        let resolved = self.resolve(config)?;
        let set = self.engine.recognizer_set(&resolved.ids).await?;
        let threshold = self.engine.config().score_threshold;
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            analyze_and_redact(&set, &text, &resolved.language, threshold)
        })
        .await?
    }
}

fn analyze_and_redact(
    set: &RecognizerSet,
    text: &str,
    language: &str,
    threshold: f32,
) -> Result<RedactionResult> {
    let matches = set.analyze(text, language, threshold)?;
    redactor::redact(text, &matches)
}
