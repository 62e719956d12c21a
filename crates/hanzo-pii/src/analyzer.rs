//! Analysis engine
//!
//! Builds recognizer sets for resolved identifier lists, caches them
//! process-wide and runs them over text.

use crate::catalog::{self, RecognizerId};
use crate::config::EngineConfig;
use crate::error::{PiiError, Result};
use crate::recognizers::Recognizer;
use crate::resolver;
use crate::types::EntityMatch;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, warn};

const WARM_UP_TEXT: &str =
    "My name is John Smith, reach me at john.smith@example.com or 415-555-0199.";

static GLOBAL: Lazy<Arc<AnalyzerEngine>> = Lazy::new(|| {
    let config = EngineConfig::from_env().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load engine configuration, using defaults");
        EngineConfig::default()
    });
    Arc::new(AnalyzerEngine::new(config))
});

/// The recognizers constructed for one identifier list
pub struct RecognizerSet {
    requested: Vec<RecognizerId>,
    recognizers: Vec<Box<dyn Recognizer>>,
    failed: Vec<(RecognizerId, String)>,
}

impl std::fmt::Debug for RecognizerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerSet")
            .field("requested", &self.requested)
            .field("loaded", &self.loaded())
            .field("failed", &self.failed)
            .finish()
    }
}

impl RecognizerSet {
    /// Construct every requested recognizer, skipping the ones that fail
    pub fn build(ids: &[RecognizerId], config: &EngineConfig) -> Result<Self> {
        let mut recognizers = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();

        for id in ids {
            match catalog::construct(*id, config) {
                Ok(recognizer) => {
                    debug!(recognizer = %id, "Loaded recognizer");
                    recognizers.push(recognizer);
                }
                Err(e) => {
                    warn!(recognizer = %id, error = %e, "Failed to load recognizer");
                    failed.push((*id, e.to_string()));
                }
            }
        }

        if recognizers.is_empty() {
            return Err(PiiError::NoRecognizersLoaded(
                ids.iter().map(|id| id.to_string()).collect(),
            ));
        }

        Ok(Self {
            requested: ids.to_vec(),
            recognizers,
            failed,
        })
    }

    /// Identifiers this set was built for
    pub fn requested(&self) -> &[RecognizerId] {
        &self.requested
    }

    /// Identifiers that constructed successfully
    pub fn loaded(&self) -> Vec<RecognizerId> {
        self.recognizers.iter().map(|r| r.id()).collect()
    }

    /// Identifiers that failed to construct, with the reason
    pub fn failed(&self) -> &[(RecognizerId, String)] {
        &self.failed
    }

    /// Number of loaded recognizers
    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    /// Whether no recognizer loaded (never true for a built set)
    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Run every recognizer supporting `language` over `text`.
    ///
    /// Results are concatenated without deduplication; matches scoring
    /// below `threshold` are dropped.
    pub fn analyze(&self, text: &str, language: &str, threshold: f32) -> Result<Vec<EntityMatch>> {
        let mut supported = self
            .recognizers
            .iter()
            .filter(|r| r.supports_language(language))
            .peekable();
        if supported.peek().is_none() {
            return Err(PiiError::UnsupportedLanguage(language.to_string()));
        }

        let matches: Vec<EntityMatch> = supported
            .flat_map(|r| r.analyze(text, language))
            .filter(|m| m.confidence >= threshold)
            .collect();

        debug!(language = %language, matches = matches.len(), "Analyzed text");
        Ok(matches)
    }
}

type SetCell = Arc<OnceCell<Arc<RecognizerSet>>>;

fn cache_key(ids: &[RecognizerId]) -> Vec<RecognizerId> {
    let mut key = ids.to_vec();
    key.sort();
    key.dedup();
    key
}

/// Analysis engine with a single-flight recognizer set cache
pub struct AnalyzerEngine {
    config: EngineConfig,
    cache: RwLock<HashMap<Vec<RecognizerId>, SetCell>>,
}

impl Default for AnalyzerEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AnalyzerEngine {
    /// Create an engine with its own empty cache
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Process-wide engine configured from `HANZO_PII_CONFIG`
    pub fn global() -> Arc<AnalyzerEngine> {
        GLOBAL.clone()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the recognizer set for `ids`, building it at most once at a time.
    ///
    /// Lists naming the same identifiers share one set whatever their order.
    /// Concurrent callers for the same list await the same build. A failed
    /// build leaves nothing behind; the next caller retries.
    pub async fn recognizer_set(&self, ids: &[RecognizerId]) -> Result<Arc<RecognizerSet>> {
        let key = cache_key(ids);
        let cell = self.cell(&key).await;

        let built = cell
            .get_or_try_init(|| {
                let ids = ids.to_vec();
                let config = self.config.clone();
                async move {
                    let started = Instant::now();
                    let count = ids.len();
                    let set =
                        tokio::task::spawn_blocking(move || RecognizerSet::build(&ids, &config))
                            .await??;
                    info!(
                        requested = count,
                        loaded = set.len(),
                        failed = set.failed().len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Built recognizer set"
                    );
                    Ok::<_, PiiError>(Arc::new(set))
                }
            })
            .await;

        match built {
            Ok(set) => Ok(set.clone()),
            Err(e) => {
                self.evict(&key, &cell).await;
                Err(e)
            }
        }
    }

    async fn cell(&self, key: &[RecognizerId]) -> SetCell {
        {
            let cache = self.cache.read().await;
            if let Some(cell) = cache.get(key) {
                return cell.clone();
            }
        }

        let mut cache = self.cache.write().await;
        cache
            .entry(key.to_vec())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Remove `cell` if it is still the uninitialized entry for `key`
    async fn evict(&self, key: &[RecognizerId], cell: &SetCell) {
        let mut cache = self.cache.write().await;
        let stale = cache
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, cell) && !current.initialized());
        if stale {
            cache.remove(key);
            debug!(recognizers = key.len(), "Evicted failed recognizer set");
        }
    }

    /// Analyze `text` with the recognizers for `ids`
    pub async fn analyze(
        &self,
        text: &str,
        ids: &[RecognizerId],
        language: &str,
    ) -> Result<Vec<EntityMatch>> {
        let set = self.recognizer_set(ids).await?;
        let text = text.to_string();
        let language = language.to_string();
        let threshold = self.config.score_threshold;

        tokio::task::spawn_blocking(move || set.analyze(&text, &language, threshold)).await?
    }

    /// Build the default recognizer set and run a warm-up analysis
    pub async fn preload(&self) -> Result<Arc<RecognizerSet>> {
        let ids = resolver::default_ids(&self.config);
        let set = self.recognizer_set(&ids).await?;

        let warm = set.clone();
        let language = self.config.default_language.clone();
        let threshold = self.config.score_threshold;
        let matches = tokio::task::spawn_blocking(move || {
            warm.analyze(WARM_UP_TEXT, &language, threshold)
        })
        .await??;

        info!(
            recognizers = ?set.loaded().iter().map(RecognizerId::as_str).collect::<Vec<_>>(),
            warm_up_matches = matches.len(),
            "Preloaded recognizers"
        );
        Ok(set)
    }

    /// Number of cached recognizer sets
    pub async fn cached_sets(&self) -> usize {
        let cache = self.cache.read().await;
        cache.values().filter(|cell| cell.initialized()).count()
    }

    /// Drop every cached recognizer set
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }
}
