use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ExtractorConfig;
use crate::models::Language;

use super::{AnthropicClient, AnthropicConfig, EntailmentModel, Generator, HttpEntailmentModel};

/// The set of loaded models.
///
/// Built once at startup and shared read-only between requests. A missing
/// entry is a legitimate state: the pipeline falls back to heuristics.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    scorers: HashMap<Language, Arc<dyn EntailmentModel>>,
    generator: Option<Arc<dyn Generator>>,
}

impl ModelRegistry {
    /// A registry with no models at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_scorer(mut self, language: Language, model: Arc<dyn EntailmentModel>) -> Self {
        self.scorers.insert(language, model);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn scorer(&self, language: Language) -> Option<&Arc<dyn EntailmentModel>> {
        self.scorers.get(&language)
    }

    pub fn generator(&self) -> Option<&Arc<dyn Generator>> {
        self.generator.as_ref()
    }

    /// Languages that have an entailment model, sorted by code
    pub fn scorer_languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.scorers.keys().copied().collect();
        languages.sort_by_key(|l| l.code());
        languages
    }

    /// Build every model the configuration allows.
    ///
    /// Never fails: a model that cannot be built is logged and left out.
    pub fn load(config: &ExtractorConfig) -> Self {
        let mut registry = Self::empty();

        let endpoints = [
            (Language::Ru, config.nli.ru_url.as_deref()),
            (Language::En, config.nli.en_url.as_deref()),
        ];
        for (language, url) in endpoints {
            let Some(url) = url else {
                warn!("No entailment model configured for {}, using heuristic scoring", language);
                continue;
            };
            match HttpEntailmentModel::new(url, config.nli.api_token.clone(), config.model_timeout) {
                Ok(model) => {
                    info!("Loaded entailment model for {} from {}", language, url);
                    registry = registry.with_scorer(language, Arc::new(model));
                }
                Err(e) => warn!("Failed to load entailment model for {}: {}", language, e),
            }
        }

        if config.llm.disabled {
            info!("Generative enrichment disabled via LLM_DISABLED");
        } else if let Some(api_key) = &config.llm.api_key {
            let llm_config = AnthropicConfig {
                api_key: api_key.clone(),
                model: config.llm.model.clone(),
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
            };
            match AnthropicClient::with_timeout(llm_config, config.model_timeout) {
                Ok(client) => {
                    info!("Loaded generative model {}", config.llm.model);
                    registry = registry.with_generator(Arc::new(client));
                }
                Err(e) => warn!("Failed to initialise generative model: {}", e),
            }
        } else {
            warn!("ANTHROPIC_API_KEY not set, enrichment falls back to heuristics");
        }

        registry
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scorers: Vec<(String, &str)> = self
            .scorer_languages()
            .into_iter()
            .filter_map(|l| self.scorers.get(&l).map(|m| (l.to_string(), m.name())))
            .collect();
        f.debug_struct("ModelRegistry")
            .field("scorers", &scorers)
            .field("generator", &self.generator.as_ref().map(|g| g.name()))
            .finish()
    }
}
