//! Recognizer resolution
//!
//! Turns a caller selection (identifiers, presets, aliases, comma-separated
//! strings) into the deduplicated, ordered identifier list the analyzer
//! builds a recognizer set for.

use crate::catalog::{self, available_presets, Preset, RecognizerId};
use crate::config::{EngineConfig, PipelineConfig, RecognizerSpec, DEFAULT_LANGUAGE};
use crate::error::{PiiError, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Resolved selection for one request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedRecognizers {
    /// Identifiers in resolution order
    pub ids: Vec<RecognizerId>,
    /// Lower-cased language code
    pub language: String,
}

/// Resolve a selection, returning `default` when it names nothing
pub fn resolve(
    spec: Option<&RecognizerSpec>,
    default: &[RecognizerId],
) -> Result<Vec<RecognizerId>> {
    let tokens = spec.map(RecognizerSpec::tokens).unwrap_or_default();
    resolve_tokens(&tokens, default)
}

/// Resolve already normalized tokens
pub fn resolve_tokens<S: AsRef<str>>(
    tokens: &[S],
    default: &[RecognizerId],
) -> Result<Vec<RecognizerId>> {
    let tokens: Vec<String> = tokens
        .iter()
        .map(|t| t.as_ref().trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        debug!(count = default.len(), "No recognizers requested, using default");
        return Ok(default.to_vec());
    }

    if tokens.iter().any(|t| Preset::parse(t) == Some(Preset::All)) {
        info!("Comprehensive recognizer set requested");
        return Ok(catalog::list_all());
    }

    let mut seen = HashSet::new();
    let mut resolved = Vec::new();
    for token in &tokens {
        let ids = match catalog::expand_preset(token) {
            Ok(ids) => {
                debug!(preset = %token, count = ids.len(), "Expanded preset");
                ids
            }
            Err(_) => match token.parse::<RecognizerId>() {
                Ok(id) => vec![id],
                Err(_) => {
                    warn!(token = %token, "Unknown recognizer or preset, skipping");
                    continue;
                }
            },
        };
        for id in ids {
            if seen.insert(id) {
                resolved.push(id);
            }
        }
    }

    if resolved.is_empty() {
        return Err(PiiError::NoValidRecognizers {
            tokens,
            available: available_presets(),
        });
    }

    info!(
        recognizers = ?resolved.iter().map(RecognizerId::as_str).collect::<Vec<_>>(),
        "Resolved recognizers"
    );
    Ok(resolved)
}

/// Engine default selection; falls back to the INDIAN preset when the
/// configured default does not resolve
pub fn default_ids(engine: &EngineConfig) -> Vec<RecognizerId> {
    let fallback = Preset::Indian.ids();
    match resolve(Some(&engine.default_recognizers), &fallback) {
        Ok(ids) => ids,
        Err(e) => {
            warn!(error = %e, "Default recognizers invalid, falling back to INDIAN");
            fallback
        }
    }
}

/// Resolve a pipeline configuration against the engine defaults
pub fn resolve_config(
    config: &PipelineConfig,
    engine: &EngineConfig,
) -> Result<ResolvedRecognizers> {
    let ids = resolve(config.recognizers.as_ref(), &default_ids(engine))?;
    let language = match config.language.trim() {
        "" => DEFAULT_LANGUAGE.to_string(),
        language => language.to_lowercase(),
    };
    Ok(ResolvedRecognizers { ids, language })
}
