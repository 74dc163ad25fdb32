pub mod config;
pub mod error;
pub mod eval;
pub mod heuristics;
pub mod io;
pub mod lexicon;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use config::{ExtractorConfig, LlmConfig, NliConfig};
pub use error::{ExtractionError, ModelError};
pub use eval::{evaluate_dataset, EvalSample, EvaluationReport};
pub use io::{load_dataset, read_transcript, HumanTaskList, TaskReport};
pub use lexicon::{CompiledLexicon, Lexicon};
pub use llm::{AnthropicClient, AnthropicConfig, EntailmentModel, Generator, HttpEntailmentModel, ModelRegistry};
pub use models::{ActionItem, Language};
pub use pipeline::{TaskExtractor, TranscriptAnalysis};
pub use stages::clean_candidate;
