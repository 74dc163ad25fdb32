pub mod client;
pub mod nli;
pub mod prompts;
pub mod registry;
pub mod validation;

pub use client::*;
pub use nli::*;
pub use prompts::*;
pub use registry::*;
pub use validation::*;

use async_trait::async_trait;

use crate::error::ModelError;

/// Zero-shot entailment scorer for one language
#[async_trait]
pub trait EntailmentModel: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Probability in `[0, 1]` that `premise` entails `hypothesis`
    async fn entailment(&self, premise: &str, hypothesis: &str) -> Result<f64, ModelError>;
}

/// Text-generation backend used for enrichment
#[async_trait]
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;

    /// Complete `prompt`; the completion may or may not echo the prompt
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
