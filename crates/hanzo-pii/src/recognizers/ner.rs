//! Model-backed named entity recognizers
//!
//! `SPACY`, `TRANSFORMERS`, `STANZA` and `GLINER` each load a local model
//! file configured under `ner_models` in the engine configuration. The model
//! format is a JSON lexicon:
//!
//! ```json
//! {
//!   "name": "en_core_people",
//!   "languages": ["en"],
//!   "score": 0.85,
//!   "honorifics": true,
//!   "entities": { "PER": ["Ada Lovelace"], "GPE": ["London"] }
//! }
//! ```
//!
//! Labels are normalized to the entity names used by the rest of the
//! catalog (`PER` becomes `PERSON`, `GPE` becomes `LOCATION`, ...).

use super::Recognizer;
use crate::catalog::RecognizerId;
use crate::config::EngineConfig;
use crate::error::{PiiError, Result};
use crate::redactor;
use crate::types::EntityMatch;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

static HONORIFIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)")
        .expect("honorific pattern is valid")
});

#[derive(Debug, Deserialize)]
struct LexiconFile {
    name: String,
    #[serde(default = "default_languages")]
    languages: Vec<String>,
    #[serde(default = "default_score")]
    score: f32,
    #[serde(default)]
    honorifics: bool,
    #[serde(default)]
    entities: BTreeMap<String, Vec<String>>,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_score() -> f32 {
    0.85
}

/// Canonical entity name for a model label
pub fn canonical_label(label: &str) -> String {
    match label.trim().to_uppercase().as_str() {
        "PER" | "PERSON" => "PERSON".to_string(),
        "LOC" | "GPE" | "LOCATION" => "LOCATION".to_string(),
        "ORG" | "ORGANIZATION" => "ORGANIZATION".to_string(),
        "NORP" | "NRP" => "NRP".to_string(),
        other => other.to_string(),
    }
}

/// Lexicon model: one compiled alternation per entity label
pub struct LexiconModel {
    name: String,
    languages: Vec<String>,
    score: f32,
    honorifics: bool,
    entities: Vec<(String, Regex)>,
}

impl LexiconModel {
    /// Load a model file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a model from JSON text
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: LexiconFile = serde_json::from_str(contents)?;

        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (label, terms) in file.entities {
            grouped
                .entry(canonical_label(&label))
                .or_default()
                .extend(terms.into_iter().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()));
        }

        let mut entities = Vec::new();
        for (entity, mut terms) in grouped {
            if terms.is_empty() {
                continue;
            }
            // Longest first so "New York City" wins over "New York"
            terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            terms.dedup();
            let alternation = terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            let regex = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
                .case_insensitive(true)
                .build()
                .map_err(|e| PiiError::ConfigError(format!("model '{}': {}", file.name, e)))?;
            entities.push((entity, regex));
        }

        Ok(Self {
            name: file.name,
            languages: file.languages.iter().map(|l| l.to_lowercase()).collect(),
            score: file.score.clamp(0.0, 1.0),
            honorifics: file.honorifics,
            entities,
        })
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Languages the model was built for
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Entity labels the model can emit
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.entities.iter().map(|(e, _)| e.clone()).collect();
        if self.honorifics && !labels.iter().any(|l| l == "PERSON") {
            labels.push("PERSON".to_string());
        }
        labels
    }

    /// Tag spans in `text`
    pub fn predict(&self, text: &str) -> Vec<EntityMatch> {
        let mut matches = Vec::new();
        for (entity, regex) in &self.entities {
            for m in regex.find_iter(text) {
                matches.push(EntityMatch::new(entity.as_str(), text, m.start(), m.end(), self.score));
            }
        }
        if self.honorifics {
            for caps in HONORIFIC.captures_iter(text) {
                if let Some(name) = caps.get(1) {
                    let duplicate = matches
                        .iter()
                        .any(|e| e.start == name.start() && e.end == name.end());
                    if !duplicate {
                        matches.push(EntityMatch::new(
                            "PERSON",
                            text,
                            name.start(),
                            name.end(),
                            self.score,
                        ));
                    }
                }
            }
        }
        matches
    }
}

/// Recognizer wrapping a loaded model
pub struct NerRecognizer {
    id: RecognizerId,
    model: LexiconModel,
}

impl NerRecognizer {
    /// Wrap an already loaded model
    pub fn new(id: RecognizerId, model: LexiconModel) -> Self {
        Self { id, model }
    }

    /// Load the model configured for `id`
    pub fn load(id: RecognizerId, config: &EngineConfig) -> Result<Self> {
        let path = config
            .ner_model(id.as_str())
            .ok_or_else(|| PiiError::RecognizerUnavailable {
                recognizer: id.to_string(),
                reason: format!("no model file configured under ner_models.{}", id),
            })?;

        let model = LexiconModel::load(path).map_err(|e| PiiError::RecognizerUnavailable {
            recognizer: id.to_string(),
            reason: format!("failed to load {}: {}", path.display(), e),
        })?;

        debug!(
            recognizer = %id,
            model = %model.name(),
            labels = ?model.labels(),
            "Loaded NER model"
        );
        Ok(Self::new(id, model))
    }
}

impl Recognizer for NerRecognizer {
    fn id(&self) -> RecognizerId {
        self.id
    }

    fn supported_entities(&self) -> Vec<String> {
        self.model.labels()
    }

    fn supports_language(&self, language: &str) -> bool {
        self.model
            .languages()
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    }

    fn analyze(&self, text: &str, _language: &str) -> Vec<EntityMatch> {
        let markers = redactor::marker_spans(text);
        let scan = redactor::mask_markers(text, &markers);
        self.model
            .predict(&scan)
            .into_iter()
            .map(|m| {
                EntityMatch::new(m.entity_type, text, m.start, m.end, m.confidence)
                    .with_recognizer(self.id.as_str())
            })
            .collect()
    }
}
