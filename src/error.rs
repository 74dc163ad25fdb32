use thiserror::Error;

/// Failures of an optional model backend.
///
/// None of these ever reach the caller of the pipeline: every variant
/// degrades to the matching heuristic path at the call site.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("model call timed out after {0} s")]
    Timeout(u64),

    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors surfaced to callers of the extraction pipeline.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal extraction error: {0}")]
    Internal(String),
}
