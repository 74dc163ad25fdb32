use serde::{Deserialize, Serialize, Serializer};

/// Maximum length of a normalized summary, in characters
pub const MAX_SUMMARY_CHARS: usize = 140;

/// Maximum number of words kept in a task candidate
pub const MAX_CANDIDATE_WORDS: usize = 16;

/// A finalized, enriched action item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    /// Normalized task description
    pub summary: String,
    /// Acceptance score from the scorer (0-1)
    #[serde(serialize_with = "serialize_confidence")]
    pub confidence: f64,
    /// Original, unnormalized candidate fragment
    pub source: Option<String>,
    /// Resolved responsible party
    pub assignee: Option<String>,
    /// Calendar date, always `YYYY-MM-DD`
    pub due: Option<String>,
    /// Usually "High", "Medium" or "Low"
    pub priority: Option<String>,
    /// Lowercase, space-free tags
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ActionItem {
    /// Create an item that has not been enriched yet
    pub fn new(summary: impl Into<String>, confidence: f64, source: Option<String>) -> Self {
        Self {
            summary: summary.into(),
            confidence,
            source,
            assignee: None,
            due: None,
            priority: None,
            labels: Vec::new(),
        }
    }
}

fn serialize_confidence<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 10_000.0).round() / 10_000.0)
}

/// A raw candidate fragment produced by the candidate generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Fragment text after trimming and re-anchoring
    pub text: String,
}

/// An accepted candidate: cleaned summary, score and raw source
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub summary: String,
    pub score: f64,
    pub source: String,
}

impl From<ScoredCandidate> for ActionItem {
    fn from(candidate: ScoredCandidate) -> Self {
        ActionItem::new(candidate.summary, candidate.score, Some(candidate.source))
    }
}
