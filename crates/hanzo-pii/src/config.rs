//! Configuration for Hanzo PII
//!
//! Two layers: [`EngineConfig`] is process-wide and usually loaded from a
//! TOML file, [`GuardrailConfig`] arrives with every request.

use crate::error::Result;
use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the engine TOML file
pub const CONFIG_ENV_VAR: &str = "HANZO_PII_CONFIG";

/// Language used when the request does not name one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Recognizer selection as written by the caller: one string (possibly
/// comma-separated) or a list of strings. Entries name presets and/or
/// recognizer identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecognizerSpec {
    One(String),
    Many(Vec<String>),
}

impl RecognizerSpec {
    /// Trimmed, upper-cased, non-empty tokens
    pub fn tokens(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            RecognizerSpec::One(value) => value.split(',').collect(),
            RecognizerSpec::Many(values) => values.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(|token| token.trim().to_uppercase())
            .filter(|token| !token.is_empty())
            .collect()
    }
}

impl Default for RecognizerSpec {
    fn default() -> Self {
        RecognizerSpec::Many(vec![])
    }
}

impl From<&str> for RecognizerSpec {
    fn from(value: &str) -> Self {
        RecognizerSpec::One(value.to_string())
    }
}

impl From<Vec<String>> for RecognizerSpec {
    fn from(values: Vec<String>) -> Self {
        RecognizerSpec::Many(values)
    }
}

impl From<Vec<&str>> for RecognizerSpec {
    fn from(values: Vec<&str>) -> Self {
        RecognizerSpec::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Per-request guardrail configuration as sent by the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardrailConfig {
    /// Explicit switch; overrides the direction-specific flags when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Rewrite requests on their way to the model
    #[serde(default)]
    pub transform_input: bool,
    /// Rewrite completions on their way to the client
    #[serde(default)]
    pub transform_output: bool,
    /// Presets and/or identifiers to run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognizers: Option<RecognizerSpec>,
    /// Adds the INDIAN preset to the selection
    #[serde(default)]
    pub indian_pii_detection: bool,
    /// Language code of the conversation
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl GuardrailConfig {
    /// Enabled config for the given recognizer selection
    pub fn enabled(recognizers: impl Into<RecognizerSpec>) -> Self {
        Self {
            enabled: Some(true),
            recognizers: Some(recognizers.into()),
            language: default_language(),
            ..Default::default()
        }
    }

    /// Set the language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Whether transformation is switched on for this direction
    pub fn is_enabled_for(&self, direction: Direction) -> bool {
        self.enabled.unwrap_or(match direction {
            Direction::Input => self.transform_input,
            Direction::Output => self.transform_output,
        })
    }

    /// Collapse into the pipeline's view for one direction
    pub fn for_direction(&self, direction: Direction) -> PipelineConfig {
        let mut recognizers = self.recognizers.clone();
        if self.indian_pii_detection {
            let mut tokens = recognizers.as_ref().map(|r| r.tokens()).unwrap_or_default();
            tokens.push("INDIAN".to_string());
            recognizers = Some(RecognizerSpec::Many(tokens));
        }
        let language = if self.language.trim().is_empty() {
            default_language()
        } else {
            self.language.trim().to_lowercase()
        };

        PipelineConfig {
            enabled: self.is_enabled_for(direction),
            recognizers,
            language,
        }
    }
}

/// What the pipeline needs to process one conversation
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Whether to analyze at all
    pub enabled: bool,
    /// Caller selection; `None` falls back to the engine default
    pub recognizers: Option<RecognizerSpec>,
    /// Language code
    pub language: String,
}

impl PipelineConfig {
    /// Enabled config for the given recognizer selection in English
    pub fn new(recognizers: impl Into<RecognizerSpec>) -> Self {
        Self {
            enabled: true,
            recognizers: Some(recognizers.into()),
            language: default_language(),
        }
    }

    /// Disabled config
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            recognizers: None,
            language: default_language(),
        }
    }
}

/// Process-wide engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Selection used when a request names no recognizers
    pub default_recognizers: RecognizerSpec,
    /// Language used for preload and when a request names none
    pub default_language: String,
    /// Matches scoring below this are discarded
    pub score_threshold: f32,
    /// Words on each side of a match searched for context words
    pub context_words: usize,
    /// Local model files for model-backed recognizers, keyed by identifier
    pub ner_models: BTreeMap<String, PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_recognizers: RecognizerSpec::One("INDIAN".to_string()),
            default_language: default_language(),
            score_threshold: 0.3,
            context_words: 5,
            ner_models: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Parse from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `HANZO_PII_CONFIG` if set, defaults otherwise
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(crate::error::PiiError::ConfigError(format!(
                "score_threshold must be within [0, 1], got {}",
                self.score_threshold
            )));
        }
        Ok(())
    }

    /// Model file configured for a recognizer identifier
    pub fn ner_model(&self, identifier: &str) -> Option<&Path> {
        self.ner_models.get(identifier).map(PathBuf::as_path)
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging
    pub enabled: bool,
    /// Log (truncated) content alongside the hash
    pub log_content: bool,
    /// Append JSON lines to this file
    pub log_file: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_content: false, // Privacy by default
            log_file: None,
        }
    }
}

/// Main configuration for [`crate::Guard`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Engine configuration
    pub engine: EngineConfig,
    /// Audit configuration
    pub audit: AuditConfig,
    /// Deadline for one guardrail decision
    pub timeout_ms: Option<u64>,
}

impl GuardConfig {
    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)?;
        config.engine.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_tokens() {
        let spec = RecognizerSpec::from(" indian, US_SSN ,,");
        assert_eq!(spec.tokens(), vec!["INDIAN", "US_SSN"]);

        let spec = RecognizerSpec::from(vec!["email", "  "]);
        assert_eq!(spec.tokens(), vec!["EMAIL"]);
    }

    #[test]
    fn test_spec_deserializes_string_or_list() {
        let one: RecognizerSpec = serde_json::from_str(r#""US,UK""#).unwrap();
        assert_eq!(one.tokens(), vec!["US", "UK"]);
        let many: RecognizerSpec = serde_json::from_str(r#"["US","UK"]"#).unwrap();
        assert_eq!(many.tokens(), vec!["US", "UK"]);
    }

    #[test]
    fn test_guardrail_config_directions() {
        let config: GuardrailConfig =
            serde_json::from_str(r#"{"transform_input": true, "recognizers": "US"}"#).unwrap();
        assert!(config.for_direction(Direction::Input).enabled);
        assert!(!config.for_direction(Direction::Output).enabled);
        assert_eq!(config.language, "en");

        let config: GuardrailConfig =
            serde_json::from_str(r#"{"enabled": false, "transform_input": true}"#).unwrap();
        assert!(!config.is_enabled_for(Direction::Input));
    }

    #[test]
    fn test_indian_flag_appends_preset() {
        let config: GuardrailConfig = serde_json::from_str(
            r#"{"transform_input": true, "recognizers": ["EMAIL"], "indian_pii_detection": true}"#,
        )
        .unwrap();
        let pipeline = config.for_direction(Direction::Input);
        assert_eq!(pipeline.recognizers.unwrap().tokens(), vec!["EMAIL", "INDIAN"]);
    }

    #[test]
    fn test_engine_config_from_toml() {
        let config = EngineConfig::from_toml(
            r#"
            default_recognizers = ["US", "CONTACT"]
            score_threshold = 0.5

            [ner_models]
            SPACY = "/opt/models/person.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_recognizers.tokens(), vec!["US", "CONTACT"]);
        assert_eq!(config.default_language, "en");
        assert!(config.ner_model("SPACY").is_some());
        assert!(config.ner_model("STANZA").is_none());
    }

    #[test]
    fn test_engine_config_rejects_threshold() {
        assert!(EngineConfig::from_toml("score_threshold = 2.0").is_err());
    }
}
