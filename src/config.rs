use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ExtractionError;

/// Default entailment acceptance threshold
pub const DEFAULT_ENTAIL_THRESHOLD: f64 = 0.60;

/// Confidence assigned when no entailment model can score a candidate
pub const HEURISTIC_CONFIDENCE: f64 = 0.65;

/// Configuration for the per-language entailment models
#[derive(Debug, Clone, Default)]
pub struct NliConfig {
    /// Inference endpoint for the Russian model (RU_NLI_MODEL_URL)
    pub ru_url: Option<String>,
    /// Inference endpoint for the English model (EN_NLI_MODEL_URL)
    pub en_url: Option<String>,
    /// Optional bearer token (NLI_API_TOKEN)
    pub api_token: Option<String>,
}

/// Configuration for the generative enrichment model
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: Option<String>,
    /// Model to use
    pub model: String,
    /// Maximum tokens in the completion
    pub max_tokens: u32,
    /// 0 means greedy decoding
    pub temperature: f64,
    /// Skip the generative path entirely (LLM_DISABLED)
    pub disabled: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 256,
            temperature: 0.0,
            disabled: false,
        }
    }
}

/// Top-level configuration for [`crate::TaskExtractor`]
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Minimum entailment probability to accept a candidate
    pub entail_threshold: f64,
    /// Confidence used when scoring falls back to heuristics
    pub heuristic_confidence: f64,
    /// Per-call timeout for both model kinds
    pub model_timeout: Duration,
    pub nli: NliConfig,
    pub llm: LlmConfig,
    /// JSON lexicon overriding the built-in tables
    pub lexicon_path: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            entail_threshold: DEFAULT_ENTAIL_THRESHOLD,
            heuristic_confidence: HEURISTIC_CONFIDENCE,
            model_timeout: Duration::from_secs(30),
            nli: NliConfig::default(),
            llm: LlmConfig::default(),
            lexicon_path: None,
        }
    }
}

impl ExtractorConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ExtractionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExtractionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let entail_threshold = parse_var(&lookup, "ENTAIL_THRESHOLD", defaults.entail_threshold)?;
        if !(0.0..=1.0).contains(&entail_threshold) {
            return Err(ExtractionError::Config(format!(
                "ENTAIL_THRESHOLD must be within [0, 1], got {}",
                entail_threshold
            )));
        }

        let timeout_secs = parse_var(
            &lookup,
            "MODEL_TIMEOUT_SECS",
            defaults.model_timeout.as_secs(),
        )?;

        let llm = LlmConfig {
            api_key: non_empty("ANTHROPIC_API_KEY"),
            model: non_empty("LLM_MODEL").unwrap_or(defaults.llm.model),
            max_tokens: parse_var(&lookup, "LLM_MAX_NEW_TOKENS", defaults.llm.max_tokens)?,
            temperature: parse_var(&lookup, "LLM_TEMPERATURE", defaults.llm.temperature)?,
            disabled: lookup("LLM_DISABLED").is_some_and(|v| is_truthy(&v)),
        };

        Ok(Self {
            entail_threshold,
            heuristic_confidence: defaults.heuristic_confidence,
            model_timeout: Duration::from_secs(timeout_secs),
            nli: NliConfig {
                ru_url: non_empty("RU_NLI_MODEL_URL"),
                en_url: non_empty("EN_NLI_MODEL_URL"),
                api_token: non_empty("NLI_API_TOKEN"),
            },
            llm,
            lexicon_path: non_empty("LEXICON_PATH").map(PathBuf::from),
        })
    }

    /// Turn off every optional model
    pub fn heuristics_only(mut self) -> Self {
        self.nli = NliConfig::default();
        self.llm.disabled = true;
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ExtractionError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| ExtractionError::Config(format!("{}={:?}: {}", key, raw, e))),
        _ => Ok(default),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ExtractorConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.entail_threshold, 0.60);
        assert_eq!(config.heuristic_confidence, 0.65);
        assert_eq!(config.llm.max_tokens, 256);
        assert_eq!(config.llm.temperature, 0.0);
        assert!(!config.llm.disabled);
        assert!(config.nli.ru_url.is_none());
        assert!(config.lexicon_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ExtractorConfig::from_lookup(lookup(&[
            ("ENTAIL_THRESHOLD", "0.75"),
            ("RU_NLI_MODEL_URL", "http://localhost:8080/nli-ru"),
            ("LLM_DISABLED", "1"),
            ("LLM_MAX_NEW_TOKENS", "128"),
            ("MODEL_TIMEOUT_SECS", "5"),
            ("ANTHROPIC_API_KEY", "  "),
        ]))
        .unwrap();

        assert_eq!(config.entail_threshold, 0.75);
        assert_eq!(config.nli.ru_url.as_deref(), Some("http://localhost:8080/nli-ru"));
        assert!(config.llm.disabled);
        assert_eq!(config.llm.max_tokens, 128);
        assert_eq!(config.model_timeout, Duration::from_secs(5));
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = ExtractorConfig::from_lookup(lookup(&[("LLM_TEMPERATURE", "warm")]));
        assert!(matches!(result, Err(ExtractionError::Config(_))));

        let result = ExtractorConfig::from_lookup(lookup(&[("ENTAIL_THRESHOLD", "1.5")]));
        assert!(matches!(result, Err(ExtractionError::Config(_))));
    }

    #[test]
    fn test_heuristics_only_clears_models() {
        let config = ExtractorConfig::from_lookup(lookup(&[("EN_NLI_MODEL_URL", "http://x")]))
            .unwrap()
            .heuristics_only();

        assert!(config.nli.en_url.is_none());
        assert!(config.llm.disabled);
    }
}
