//! Entity recognizers
//!
//! Every detector in the catalog implements [`Recognizer`]. Most are
//! [`PatternRecognizer`]s: a handful of weighted regexes, an optional checksum
//! validator and a list of context words that raise the score of a nearby
//! match. Model-backed recognizers live in [`ner`].

pub mod apac;
pub mod contact;
pub mod datetime;
pub mod europe;
pub mod financial;
pub mod india;
pub mod ner;
pub mod uk;
pub mod us;
pub mod validators;

use crate::catalog::RecognizerId;
use crate::error::{PiiError, Result};
use crate::redactor;
use crate::types::EntityMatch;
use regex::Regex;

/// Score given to a match whose checksum validated
pub const MAX_SCORE: f32 = 1.0;

/// Added to a match's score when a context word surrounds it
pub const CONTEXT_BOOST: f32 = 0.35;

/// Floor for a match with supporting context
pub const MIN_SCORE_WITH_CONTEXT: f32 = 0.4;

/// A detector for one category of sensitive data
pub trait Recognizer: Send + Sync {
    /// Catalog identifier of this recognizer
    fn id(&self) -> RecognizerId;

    /// Entity types this recognizer can emit
    fn supported_entities(&self) -> Vec<String>;

    /// Whether this recognizer can analyze text in `language`
    fn supports_language(&self, _language: &str) -> bool {
        true
    }

    /// Detect entities in `text`
    fn analyze(&self, text: &str, language: &str) -> Vec<EntityMatch>;
}

/// Outcome of a checksum validator: `Some(true)` promotes the match to
/// [`MAX_SCORE`], `Some(false)` discards it, `None` keeps the pattern score.
pub type Validator = fn(&str) -> Option<bool>;

/// One weighted regex
pub struct Pattern {
    name: &'static str,
    regex: Regex,
    score: f32,
}

impl Pattern {
    /// Compile a pattern
    pub fn new(name: &'static str, regex: &str, score: f32) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(regex)?,
            score,
        })
    }

    /// Pattern name
    pub fn name(&self) -> &str {
        self.name
    }
}

/// Regex-based recognizer for a single entity type
pub struct PatternRecognizer {
    id: RecognizerId,
    entity: &'static str,
    patterns: Vec<Pattern>,
    context: &'static [&'static str],
    validator: Option<Validator>,
    context_words: usize,
}

impl PatternRecognizer {
    /// Start building a recognizer that emits `entity`
    pub fn new(id: RecognizerId, entity: &'static str) -> Self {
        Self {
            id,
            entity,
            patterns: Vec::new(),
            context: &[],
            validator: None,
            context_words: 5,
        }
    }

    /// Add a weighted pattern
    pub fn pattern(mut self, name: &'static str, regex: &str, score: f32) -> Result<Self> {
        let pattern = Pattern::new(name, regex, score).map_err(|e| PiiError::RecognizerUnavailable {
            recognizer: self.id.to_string(),
            reason: format!("pattern '{}' failed to compile: {}", name, e),
        })?;
        self.patterns.push(pattern);
        Ok(self)
    }

    /// Set the context words
    pub fn context(mut self, words: &'static [&'static str]) -> Self {
        self.context = words;
        self
    }

    /// Set the checksum validator
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Set how many words on each side are searched for context
    pub fn context_window(mut self, words: usize) -> Self {
        self.context_words = words;
        self
    }

    /// Entity type emitted by this recognizer
    pub fn entity(&self) -> &str {
        self.entity
    }

    /// Context is read up to the nearest marker on either side; marker
    /// names and the text beyond them never count.
    fn has_context(&self, text: &str, markers: &[(usize, usize)], start: usize, end: usize) -> bool {
        if self.context.is_empty() || self.context_words == 0 {
            return false;
        }

        let from = markers
            .iter()
            .filter(|(_, e)| *e <= start)
            .map(|(_, e)| *e)
            .max()
            .unwrap_or(0);
        let to = markers
            .iter()
            .filter(|(s, _)| *s >= end)
            .map(|(s, _)| *s)
            .min()
            .unwrap_or(text.len());

        let before: Vec<String> = words(&text[from..start])
            .rev()
            .take(self.context_words)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let after: Vec<String> = words(&text[end..to]).take(self.context_words).collect();

        let window = format!(" {} {} ", before.join(" "), after.join(" "));
        self.context
            .iter()
            .any(|word| window.contains(&format!(" {} ", word)))
    }
}

/// Lower-cased words of `text`, split on anything that is not alphanumeric
fn words(text: &str) -> impl DoubleEndedIterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

impl Recognizer for PatternRecognizer {
    fn id(&self) -> RecognizerId {
        self.id
    }

    fn supported_entities(&self) -> Vec<String> {
        vec![self.entity.to_string()]
    }

    fn analyze(&self, text: &str, _language: &str) -> Vec<EntityMatch> {
        let mut matches: Vec<EntityMatch> = Vec::new();
        let markers = redactor::marker_spans(text);
        let scan = redactor::mask_markers(text, &markers);

        for pattern in &self.patterns {
            for m in pattern.regex.find_iter(&scan) {
                let mut score = pattern.score;
                if let Some(validate) = self.validator {
                    match validate(m.as_str()) {
                        Some(true) => score = MAX_SCORE,
                        Some(false) => continue,
                        None => {}
                    }
                }
                if score < MAX_SCORE && self.has_context(text, &markers, m.start(), m.end()) {
                    score = (score + CONTEXT_BOOST).max(MIN_SCORE_WITH_CONTEXT).min(MAX_SCORE);
                }

                // Several patterns of one recognizer may hit the same span
                if let Some(existing) = matches
                    .iter_mut()
                    .find(|e| e.start == m.start() && e.end == m.end())
                {
                    existing.confidence = existing.confidence.max(score);
                    continue;
                }

                matches.push(
                    EntityMatch::new(self.entity, text, m.start(), m.end(), score)
                        .with_recognizer(self.id.as_str()),
                );
            }
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers() -> PatternRecognizer {
        PatternRecognizer::new(RecognizerId::UsBankAccount, "US_BANK_NUMBER")
            .pattern("digits", r"\b\d{8}\b", 0.05)
            .unwrap()
            .pattern("digits again", r"\b\d{8}\b", 0.2)
            .unwrap()
            .context(&["account", "acct"])
    }

    #[test]
    fn test_same_span_keeps_best_score() {
        let matches = numbers().analyze("ref 12345678", "en");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].confidence, 0.2);
        assert_eq!(matches[0].recognizer.as_deref(), Some("US_BANK_ACCOUNT"));
    }

    #[test]
    fn test_context_boost() {
        let matches = numbers().analyze("my account is 12345678", "en");
        assert!((matches[0].confidence - 0.55).abs() < 1e-6);

        let far = numbers()
            .context_window(1)
            .analyze("account one two three 12345678", "en");
        assert_eq!(far[0].confidence, 0.2);
    }

    #[test]
    fn test_marker_bounds_context() {
        let matches = numbers().analyze("[ACCOUNT_ID] 12345678", "en");
        assert_eq!(matches[0].confidence, 0.2);

        let matches = numbers().analyze("account [X] 12345678", "en");
        assert_eq!(matches[0].confidence, 0.2);

        let matches = numbers().analyze("[X] account 12345678", "en");
        assert!((matches[0].confidence - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_marker_is_opaque_to_patterns() {
        assert!(numbers().analyze("ref [X]12345678", "en").is_empty());
        assert!(numbers().analyze("[X12345678]", "en").is_empty());
    }

    #[test]
    fn test_validator_outcomes() {
        fn even_only(value: &str) -> Option<bool> {
            Some(value.ends_with(|c: char| matches!(c, '0' | '2' | '4' | '6' | '8')))
        }
        let recognizer = numbers().validator(even_only);
        let matches = recognizer.analyze("12345678 12345677", "en");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_text, "12345678");
        assert_eq!(matches[0].confidence, MAX_SCORE);
    }

    #[test]
    fn test_bad_pattern_is_unavailable() {
        let err = PatternRecognizer::new(RecognizerId::Email, "EMAIL_ADDRESS")
            .pattern("broken", r"(unclosed", 0.5)
            .err()
            .unwrap();
        assert!(matches!(err, PiiError::RecognizerUnavailable { .. }));
    }
}
