//! Error types for Hanzo PII

use std::time::Duration;
use thiserror::Error;

/// Result type alias for PII engine operations
pub type Result<T> = std::result::Result<T, PiiError>;

/// PII engine error types
#[derive(Debug, Error)]
pub enum PiiError {
    /// Preset name is not one of the enumerated presets
    #[error("Invalid preset '{name}'. Available presets: {available}")]
    UnknownPreset { name: String, available: String },

    /// Identifier is not in the recognizer catalog
    #[error("Recognizer '{0}' not found in catalog")]
    UnknownRecognizer(String),

    /// Nothing in the configuration resolved to a catalogued recognizer
    #[error("No valid recognizers found in configuration: {tokens:?}. Available presets: {available}")]
    NoValidRecognizers {
        tokens: Vec<String>,
        available: String,
    },

    /// A recognizer could not be constructed (missing model, remote service, ...)
    #[error("Recognizer '{recognizer}' unavailable: {reason}")]
    RecognizerUnavailable { recognizer: String, reason: String },

    /// Every requested recognizer failed to construct
    #[error("No recognizers could be loaded from requested list: {0:?}")]
    NoRecognizersLoaded(Vec<String>),

    /// None of the loaded recognizers supports the requested language
    #[error("No loaded recognizer supports language '{0}'")]
    UnsupportedLanguage(String),

    /// A match span does not fit the text it was produced against
    #[error("Invalid span [{start}, {end}) for {entity_type} in text of length {len}")]
    InvalidSpan {
        entity_type: String,
        start: usize,
        end: usize,
        len: usize,
    },

    /// Caller deadline elapsed before a decision was produced
    #[error("Guardrail processing timed out after {0:?}")]
    Timeout(Duration),

    /// Unexpected engine failure (worker panic, poisoned state)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification of a [`PiiError`] for the request boundary.
///
/// Callers use this to tell "bad config" apart from "engine bug".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller's configuration cannot be served
    Config,
    /// The engine itself misbehaved
    Internal,
    /// The caller's deadline elapsed
    Timeout,
    /// Reading configuration or model files failed
    Io,
}

impl PiiError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PiiError::UnknownPreset { .. }
            | PiiError::UnknownRecognizer(_)
            | PiiError::NoValidRecognizers { .. }
            | PiiError::RecognizerUnavailable { .. }
            | PiiError::NoRecognizersLoaded(_)
            | PiiError::UnsupportedLanguage(_)
            | PiiError::ConfigError(_)
            | PiiError::SerializationError(_)
            | PiiError::TomlError(_) => ErrorKind::Config,
            PiiError::InvalidSpan { .. } | PiiError::Internal(_) => ErrorKind::Internal,
            PiiError::Timeout(_) => ErrorKind::Timeout,
            PiiError::IoError(_) => ErrorKind::Io,
        }
    }

    /// Whether this error stems from caller configuration
    pub fn is_config_error(&self) -> bool {
        self.kind() == ErrorKind::Config
    }

    /// Whether this error is an engine failure
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}

impl From<tokio::task::JoinError> for PiiError {
    fn from(err: tokio::task::JoinError) -> Self {
        PiiError::Internal(format!("analysis worker failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = PiiError::NoValidRecognizers {
            tokens: vec!["BOGUS".to_string()],
            available: "US, UK".to_string(),
        };
        assert!(err.is_config_error());
        assert!(err.to_string().contains("US, UK"));

        let err = PiiError::InvalidSpan {
            entity_type: "EMAIL_ADDRESS".to_string(),
            start: 4,
            end: 2,
            len: 10,
        };
        assert!(err.is_internal());
        assert!(!err.is_config_error());

        assert_eq!(
            PiiError::Timeout(Duration::from_millis(5)).kind(),
            ErrorKind::Timeout
        );
    }
}
