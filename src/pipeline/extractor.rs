use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::lexicon::{CompiledLexicon, Lexicon};
use crate::llm::ModelRegistry;
use crate::models::{ActionItem, Language};
use crate::stages::{
    candidate_actions, deduplicate, detect_language, enrich_candidates, score_candidates,
    split_sentences, ConfidenceScorer, Enricher, ScoringConfig,
};

/// What the pipeline sees in a transcript before any model is involved
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptAnalysis {
    pub language: Language,
    pub sentences: Vec<String>,
    pub candidates: Vec<String>,
}

/// Extracts action items from meeting transcripts.
///
/// Owns the compiled lexicon and the model registry. The registry is
/// installed by [`TaskExtractor::startup`] and read by every request; until
/// then, and after [`TaskExtractor::shutdown`], extraction runs on
/// heuristics alone.
pub struct TaskExtractor {
    config: ExtractorConfig,
    lexicon: Arc<CompiledLexicon>,
    registry: RwLock<Option<Arc<ModelRegistry>>>,
}

impl TaskExtractor {
    /// Build an extractor, loading the lexicon from `config.lexicon_path`
    /// when set
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractionError> {
        let lexicon = match &config.lexicon_path {
            Some(path) => {
                info!("Loading lexicon from {:?}", path);
                Lexicon::from_file(path)?.compile()?
            }
            None => CompiledLexicon::builtin()?,
        };
        Ok(Self::with_lexicon(config, lexicon))
    }

    pub fn with_lexicon(config: ExtractorConfig, lexicon: CompiledLexicon) -> Self {
        Self {
            config,
            lexicon: Arc::new(lexicon),
            registry: RwLock::new(None),
        }
    }

    pub fn lexicon(&self) -> &CompiledLexicon {
        &self.lexicon
    }

    /// Load every configured model. Later calls are no-ops.
    pub async fn startup(&self) {
        let mut slot = self.registry.write().await;
        if slot.is_some() {
            debug!("Models already loaded");
            return;
        }

        let registry = ModelRegistry::load(&self.config);
        info!(
            "Startup complete: scorers for {:?}, generator: {}",
            registry.scorer_languages(),
            registry.generator().map(|g| g.name()).unwrap_or("none")
        );
        *slot = Some(Arc::new(registry));
    }

    /// Install an already-built registry. A no-op if models are loaded.
    pub async fn startup_with(&self, registry: ModelRegistry) {
        let mut slot = self.registry.write().await;
        if slot.is_none() {
            *slot = Some(Arc::new(registry));
        }
    }

    /// Drop every loaded model. Requests already running keep their snapshot.
    pub async fn shutdown(&self) {
        if self.registry.write().await.take().is_some() {
            info!("Models released");
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.registry.read().await.is_some()
    }

    /// Extract action items, resolving relative dates against today (UTC)
    pub async fn extract_tasks(&self, text: &str) -> Result<Vec<ActionItem>, ExtractionError> {
        self.extract_tasks_on(text, Utc::now().date_naive()).await
    }

    /// Extract action items, resolving relative dates against `today`
    pub async fn extract_tasks_on(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<Vec<ActionItem>, ExtractionError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let registry = self.registry.read().await.clone().unwrap_or_default();
        let span = info_span!("extract", request_id = %Uuid::new_v4());

        self.run(text, today, &registry).instrument(span).await
    }

    async fn run(
        &self,
        text: &str,
        today: NaiveDate,
        registry: &ModelRegistry,
    ) -> Result<Vec<ActionItem>, ExtractionError> {
        let language = detect_language(text);
        let candidates = candidate_actions(text, &self.lexicon);
        let candidate_count = candidates.len();
        debug!("Language {}, {} candidates", language, candidate_count);

        let scoring = ScoringConfig {
            entail_threshold: self.config.entail_threshold,
            heuristic_confidence: self.config.heuristic_confidence,
            timeout: self.config.model_timeout,
        };
        let scorer = ConfidenceScorer::new(registry, &self.lexicon, &scoring);
        let scored = score_candidates(candidates, language, &scorer).await;
        let accepted = scored.len();

        let unique = deduplicate(scored);
        debug!("{} accepted, {} after deduplication", accepted, unique.len());

        let enricher = Enricher::new(registry.generator(), &self.lexicon, self.config.model_timeout);
        let items = enrich_candidates(unique, text, today, &enricher).await;

        if let Some(item) = items.iter().find(|item| item.summary.trim().is_empty()) {
            return Err(ExtractionError::Internal(format!(
                "empty summary produced from source {:?}",
                item.source
            )));
        }

        info!(
            "Extracted {} action items from {} candidates",
            items.len(),
            candidate_count
        );
        Ok(items)
    }

    /// Segment and generate candidates without scoring or enrichment
    pub fn analyze(&self, text: &str) -> TranscriptAnalysis {
        TranscriptAnalysis {
            language: detect_language(text),
            sentences: split_sentences(text).map(str::to_string).collect(),
            candidates: candidate_actions(text, &self.lexicon)
                .into_iter()
                .map(|c| c.text)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::config::HEURISTIC_CONFIDENCE;
    use crate::error::ModelError;
    use crate::llm::EntailmentModel;

    const MEETING: &str = "Нужно подготовить отчёт к пятнице. Также свяжись с клиентом.";

    /// Returns its scores in call order
    struct SequenceModel {
        scores: Vec<f64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EntailmentModel for SequenceModel {
        fn name(&self) -> &str {
            "sequence"
        }

        async fn entailment(&self, _premise: &str, _hypothesis: &str) -> Result<f64, ModelError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.scores
                .get(call)
                .copied()
                .ok_or_else(|| ModelError::Invocation("no more scores".to_string()))
        }
    }

    fn extractor() -> TaskExtractor {
        TaskExtractor::with_lexicon(
            ExtractorConfig::default().heuristics_only(),
            CompiledLexicon::builtin().unwrap(),
        )
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn test_meeting_without_models() {
        let items = extractor().extract_tasks_on(MEETING, monday()).await.unwrap();

        assert_eq!(items.len(), 2);
        assert!(items[0].summary.starts_with("подготовить отчёт"));
        assert_eq!(items[0].due.as_deref(), Some("2025-03-14"));
        assert!(items[1].summary.starts_with("свяж"));
        assert!(items[1].labels.contains(&"sales".to_string()));
        assert!(items.iter().all(|i| i.confidence == HEURISTIC_CONFIDENCE));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let extractor = extractor();

        assert!(extractor.extract_tasks_on("", monday()).await.unwrap().is_empty());
        assert!(extractor.extract_tasks_on("  \n\t ", monday()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_verb_cue() {
        let items = extractor()
            .extract_tasks_on("Встреча прошла хорошо.", monday())
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_relative_due_date() {
        let items = extractor()
            .extract_tasks_on("нужно сделать это завтра", monday())
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].due.as_deref(), Some("2025-03-11"));
    }

    #[tokio::test]
    async fn test_duplicate_keeps_highest_score() {
        let extractor = extractor();
        let model = SequenceModel {
            scores: vec![0.7, 0.9],
            calls: AtomicUsize::new(0),
        };
        extractor
            .startup_with(ModelRegistry::empty().with_scorer(Language::En, Arc::new(model)))
            .await;

        let items = extractor
            .extract_tasks_on("send the deck. please send the deck!", monday())
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].summary, "send the deck");
        assert_eq!(items[0].confidence, 0.9);
    }

    #[tokio::test]
    async fn test_lifecycle_is_idempotent() {
        let extractor = extractor();
        assert!(!extractor.is_initialized().await);

        extractor.startup().await;
        extractor.startup().await;
        assert!(extractor.is_initialized().await);

        extractor.shutdown().await;
        extractor.shutdown().await;
        assert!(!extractor.is_initialized().await);

        let items = extractor.extract_tasks_on(MEETING, monday()).await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let extractor = extractor();
        extractor.startup().await;

        let (a, b) = tokio::join!(
            extractor.extract_tasks_on(MEETING, monday()),
            extractor.extract_tasks_on("fix the build tomorrow", monday())
        );

        assert_eq!(a.unwrap().len(), 2);
        let b = b.unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].due.as_deref(), Some("2025-03-11"));
    }

    #[test]
    fn test_analyze() {
        let analysis = extractor().analyze(MEETING);

        assert_eq!(analysis.language, Language::Ru);
        assert_eq!(analysis.sentences.len(), 2);
        assert_eq!(
            analysis.candidates,
            vec!["подготовить отчёт к пятнице", "свяжись с клиентом"]
        );
    }
}
