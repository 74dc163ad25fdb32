use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::ModelError;
use crate::heuristics::fallback_enrich;
use crate::lexicon::CompiledLexicon;
use crate::llm::{build_enrichment_prompt, parse_enrichment, strip_prompt_echo, Generator};
use crate::models::{ActionItem, ScoredCandidate};

/// Adds assignee, due date, priority and labels to deduplicated items
pub struct Enricher<'a> {
    generator: Option<&'a Arc<dyn Generator>>,
    lexicon: &'a CompiledLexicon,
    timeout: Duration,
}

impl<'a> Enricher<'a> {
    pub fn new(
        generator: Option<&'a Arc<dyn Generator>>,
        lexicon: &'a CompiledLexicon,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            lexicon,
            timeout,
        }
    }

    /// Enrich one item.
    ///
    /// Uses the generator when one is loaded. No generator, a failed call
    /// or unusable output all route this item, and only this item, to the
    /// heuristic chain.
    pub async fn enrich(&self, item: &ActionItem, context: &str, today: NaiveDate) -> ActionItem {
        let Some(generator) = self.generator else {
            return fallback_enrich(item, context, self.lexicon, today);
        };

        match self.enrich_with_model(&**generator, item, context, today).await {
            Ok(enriched) => enriched,
            Err(ModelError::MalformedOutput(reason)) => {
                debug!("Unusable output for {:?}, using heuristics: {}", item.summary, reason);
                fallback_enrich(item, context, self.lexicon, today)
            }
            Err(e) => {
                warn!(
                    "Generator {} failed for {:?}, using heuristics: {}",
                    generator.name(),
                    item.summary,
                    e
                );
                fallback_enrich(item, context, self.lexicon, today)
            }
        }
    }

    async fn enrich_with_model(
        &self,
        generator: &dyn Generator,
        item: &ActionItem,
        context: &str,
        today: NaiveDate,
    ) -> Result<ActionItem, ModelError> {
        let prompt = build_enrichment_prompt(&item.summary, context);

        let completion = tokio::time::timeout(self.timeout, generator.generate(&prompt))
            .await
            .map_err(|_| ModelError::Timeout(self.timeout.as_secs()))??;

        let payload = parse_enrichment(strip_prompt_echo(&completion, &prompt), self.lexicon, today)?;

        Ok(ActionItem {
            summary: item.summary.clone(),
            confidence: item.confidence,
            source: item.source.clone(),
            assignee: payload.assignee,
            due: payload.due,
            priority: payload.priority,
            labels: payload.labels,
        })
    }
}

/// Execute Stage 4: enrich every deduplicated candidate, in order
pub async fn enrich_candidates(
    candidates: Vec<ScoredCandidate>,
    context: &str,
    today: NaiveDate,
    enricher: &Enricher<'_>,
) -> Vec<ActionItem> {
    let mut items = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let item = ActionItem::from(candidate);
        items.push(enricher.enrich(&item, context, today).await);
    }

    items
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct CannedGenerator {
        reply: Result<String, String>,
        echo: bool,
    }

    #[async_trait]
    impl Generator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            match &self.reply {
                Ok(text) if self.echo => Ok(format!("{}{}", prompt, text)),
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(ModelError::Invocation(e.clone())),
            }
        }
    }

    fn generator(reply: Result<&str, &str>, echo: bool) -> Arc<dyn Generator> {
        Arc::new(CannedGenerator {
            reply: reply.map(str::to_string).map_err(str::to_string),
            echo,
        })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn item() -> ActionItem {
        ActionItem::new("send the deck", 0.9, Some("please send the deck.".to_string()))
    }

    #[tokio::test]
    async fn test_model_path_keeps_summary_and_confidence() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let generator = generator(
            Ok(r#" {"summary": "Send slides", "assignee": "Anna", "due": "tomorrow",
                "priority": "High", "labels": ["Sales"]}"#),
            true,
        );
        let enricher = Enricher::new(Some(&generator), &lexicon, Duration::from_secs(5));

        let enriched = enricher.enrich(&item(), "Anna will send the deck", today()).await;

        assert_eq!(enriched.summary, "send the deck");
        assert_eq!(enriched.confidence, 0.9);
        assert_eq!(enriched.source.as_deref(), Some("please send the deck."));
        assert_eq!(enriched.assignee.as_deref(), Some("Anna"));
        assert_eq!(enriched.due.as_deref(), Some("2025-03-11"));
        assert_eq!(enriched.priority.as_deref(), Some("High"));
        assert_eq!(enriched.labels, vec!["sales"]);
    }

    #[tokio::test]
    async fn test_single_quoted_output_accepted() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let generator = generator(Ok("{'assignee': 'Олег', 'priority': 'Low'}"), false);
        let enricher = Enricher::new(Some(&generator), &lexicon, Duration::from_secs(5));

        let enriched = enricher.enrich(&item(), "", today()).await;

        assert_eq!(enriched.assignee.as_deref(), Some("Олег"));
        assert_eq!(enriched.priority.as_deref(), Some("Low"));
        assert_eq!(enriched.due, None);
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let generator = generator(Ok("I cannot help with that."), false);
        let enricher = Enricher::new(Some(&generator), &lexicon, Duration::from_secs(5));

        let enriched = enricher.enrich(&item(), "Anna: send the deck to the client", today()).await;

        // Heuristic chain: Medium priority, assignee from context, sales label
        assert_eq!(enriched.priority.as_deref(), Some("Medium"));
        assert_eq!(enriched.assignee.as_deref(), Some("Anna"));
        assert_eq!(enriched.labels, vec!["sales"]);
    }

    #[tokio::test]
    async fn test_invocation_failure_falls_back() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let generator = generator(Err("connection reset"), false);
        let enricher = Enricher::new(Some(&generator), &lexicon, Duration::from_secs(5));

        let enriched = enricher.enrich(&item(), "send the deck friday", today()).await;

        assert_eq!(enriched.summary, "send the deck");
        assert_eq!(enriched.due.as_deref(), Some("2025-03-14"));
        assert_eq!(enriched.priority.as_deref(), Some("Medium"));
    }

    #[tokio::test]
    async fn test_enrich_candidates_without_generator() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let enricher = Enricher::new(None, &lexicon, Duration::from_secs(5));
        let candidates = vec![ScoredCandidate {
            summary: "urgent fix the build".to_string(),
            score: 0.65,
            source: "urgent fix the build!".to_string(),
        }];

        let items = enrich_candidates(candidates, "", today(), &enricher).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].priority.as_deref(), Some("High"));
        assert_eq!(items[0].confidence, 0.65);
    }
}
