use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{DEFAULT_ENTAIL_THRESHOLD, HEURISTIC_CONFIDENCE};
use crate::error::ModelError;
use crate::lexicon::CompiledLexicon;
use crate::llm::ModelRegistry;
use crate::models::{Candidate, Language, ScoredCandidate, MAX_SUMMARY_CHARS};

/// Configuration for Stage 2
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Minimum entailment probability for a candidate to be accepted
    pub entail_threshold: f64,
    /// Confidence assigned when no scorer model is loaded for the language
    pub heuristic_confidence: f64,
    /// Per-call model timeout
    pub timeout: Duration,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            entail_threshold: DEFAULT_ENTAIL_THRESHOLD,
            heuristic_confidence: HEURISTIC_CONFIDENCE,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Normalize a raw candidate into a summary.
///
/// Strips a leading politeness/necessity marker, enclosing dashes and
/// bullets, trailing punctuation, and truncates to 140 characters. Applied
/// until nothing changes, so a second application is always a no-op.
pub fn clean_candidate(candidate: &str, lexicon: &CompiledLexicon) -> String {
    let mut current = candidate.to_string();
    loop {
        let next = clean_once(&current, lexicon);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_once(text: &str, lexicon: &CompiledLexicon) -> String {
    let mut text = text;

    if let Some(prefix) = &lexicon.politeness_prefix {
        if let Some(m) = prefix.find(text) {
            text = &text[m.end()..];
        }
    }

    let text = text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '—' | '•'));
    let text = text.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '!'));

    text.chars().take(MAX_SUMMARY_CHARS).collect()
}

/// Scores candidates, either through the language's entailment model or
/// with the fixed heuristic confidence
pub struct ConfidenceScorer<'a> {
    registry: &'a ModelRegistry,
    lexicon: &'a CompiledLexicon,
    config: &'a ScoringConfig,
}

impl<'a> ConfidenceScorer<'a> {
    pub fn new(
        registry: &'a ModelRegistry,
        lexicon: &'a CompiledLexicon,
        config: &'a ScoringConfig,
    ) -> Self {
        Self {
            registry,
            lexicon,
            config,
        }
    }

    /// Score one cleaned candidate.
    ///
    /// Returns `None` when the model rejects the candidate (probability
    /// below the threshold). A missing, failing or slow model never
    /// rejects: the candidate is accepted with the heuristic confidence.
    pub async fn score(&self, text: &str, language: Language) -> Option<f64> {
        let Some(model) = self.registry.scorer(language) else {
            return Some(self.config.heuristic_confidence);
        };

        let hypothesis = self.lexicon.lexicon.hypotheses.for_language(language);
        let result = tokio::time::timeout(self.config.timeout, model.entailment(text, hypothesis))
            .await
            .unwrap_or_else(|_| Err(ModelError::Timeout(self.config.timeout.as_secs())))
            .and_then(|p| {
                if (0.0..=1.0).contains(&p) {
                    Ok(p)
                } else {
                    Err(ModelError::MalformedOutput(format!(
                        "entailment probability out of range: {}",
                        p
                    )))
                }
            });

        match result {
            Ok(p) if p >= self.config.entail_threshold => Some(p),
            Ok(p) => {
                debug!("Rejected {:?}: entailment {:.3} below threshold", text, p);
                None
            }
            Err(e) => {
                warn!(
                    "Scorer {} failed for {:?}, using heuristic confidence: {}",
                    model.name(),
                    text,
                    e
                );
                Some(self.config.heuristic_confidence)
            }
        }
    }
}

/// Execute Stage 2: clean and score
///
/// Candidates that clean down to nothing are dropped, as are those the
/// scorer rejects. Document order is preserved.
pub async fn score_candidates(
    candidates: Vec<Candidate>,
    language: Language,
    scorer: &ConfidenceScorer<'_>,
) -> Vec<ScoredCandidate> {
    let mut scored = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let summary = clean_candidate(&candidate.text, scorer.lexicon);
        if summary.is_empty() {
            continue;
        }

        if let Some(score) = scorer.score(&summary, language).await {
            scored.push(ScoredCandidate {
                summary,
                score,
                source: candidate.text,
            });
        }
    }

    scored
}
