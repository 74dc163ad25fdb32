mod defaults;

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::Language;

/// Entailment hypothesis sentence per language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypotheses {
    pub ru: String,
    pub en: String,
}

impl Hypotheses {
    pub fn for_language(&self, language: Language) -> &str {
        match language {
            Language::Ru => &self.ru,
            Language::En => &self.en,
        }
    }
}

/// Relative-day keyword and its offset from today
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeDay {
    pub keyword: String,
    pub days: i64,
}

/// A weekday form (0 = Monday)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayForm {
    pub form: String,
    pub weekday: u32,
}

/// A month-name prefix (1 = January)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthPrefix {
    pub prefix: String,
    pub month: u32,
}

/// A label and the keyword substrings that trigger it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRule {
    pub label: String,
    pub keywords: Vec<String>,
}

/// A strict explicit-date template.
///
/// `shape` must match the whole input before `format` is tried, which keeps
/// `%Y` from accepting two-digit years.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateTemplate {
    pub shape: String,
    pub format: String,
    pub has_year: bool,
}

/// All keyword tables used by segmentation, scoring and enrichment.
///
/// A JSON file (`LEXICON_PATH`) can replace any table; missing tables keep
/// their built-in defaults. [`Lexicon::compile`] builds the runtime regexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Verb stems; a stem matches at the start of a word
    pub verb_stems: Vec<String>,
    /// Conjunctions splitting compound sentences
    pub compound_separators: Vec<String>,
    /// Leading markers removed from candidate fragments
    pub discourse_markers: Vec<String>,
    /// Leading markers removed when cleaning a candidate
    pub politeness_markers: Vec<String>,
    pub hypotheses: Hypotheses,
    pub relative_days: Vec<RelativeDay>,
    pub weekdays: Vec<WeekdayForm>,
    pub months: Vec<MonthPrefix>,
    pub labels: Vec<LabelRule>,
    pub urgency_keywords: Vec<String>,
    pub deferral_keywords: Vec<String>,
    /// Lowercase pronouns never accepted as assignees
    pub assignee_stoplist: Vec<String>,
    pub date_templates: Vec<DateTemplate>,
}

impl Default for Lexicon {
    fn default() -> Self {
        defaults::builtin()
    }
}

impl Lexicon {
    /// Load a lexicon from a JSON file; missing tables keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ExtractionError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExtractionError::InvalidLexicon(format!("failed to read {:?}: {}", path, e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| ExtractionError::InvalidLexicon(format!("{:?}: {}", path, e)))
    }

    /// Compile the tables into matchers
    pub fn compile(self) -> Result<CompiledLexicon, ExtractionError> {
        if self.verb_stems.is_empty() {
            return Err(ExtractionError::InvalidLexicon(
                "verb_stems must not be empty".to_string(),
            ));
        }

        let verb_cue = build_regex(&format!(r"(?i)\b(?:{})", alternation(&self.verb_stems)))?;
        let compound_separator = if self.compound_separators.is_empty() {
            None
        } else {
            Some(build_regex(&format!(
                r"(?i)\b(?:{})\b",
                alternation(&self.compound_separators)
            ))?)
        };
        let discourse_prefix = prefix_regex(&self.discourse_markers)?;
        let politeness_prefix = prefix_regex(&self.politeness_markers)?;

        let date_templates = self
            .date_templates
            .iter()
            .map(|t| {
                Ok(CompiledTemplate {
                    shape: build_regex(&t.shape)?,
                    format: t.format.clone(),
                    has_year: t.has_year,
                })
            })
            .collect::<Result<Vec<_>, ExtractionError>>()?;

        if let Some(bad) = self.weekdays.iter().find(|w| w.weekday > 6) {
            return Err(ExtractionError::InvalidLexicon(format!(
                "weekday index {} out of range for {:?}",
                bad.weekday, bad.form
            )));
        }
        if let Some(bad) = self.months.iter().find(|m| !(1..=12).contains(&m.month)) {
            return Err(ExtractionError::InvalidLexicon(format!(
                "month {} out of range for {:?}",
                bad.month, bad.prefix
            )));
        }

        let relative_days = self
            .relative_days
            .iter()
            .filter(|r| !r.keyword.trim().is_empty())
            .map(|r| RelativeDay {
                keyword: r.keyword.trim().to_lowercase(),
                days: r.days,
            })
            .collect();

        debug!(
            "Compiled lexicon: {} verb stems, {} separators, {} label rules",
            self.verb_stems.len(),
            self.compound_separators.len(),
            self.labels.len()
        );

        Ok(CompiledLexicon {
            verb_cue,
            compound_separator,
            discourse_prefix,
            politeness_prefix,
            date_templates,
            relative_days,
            lexicon: self,
        })
    }
}

/// A compiled date template
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    pub shape: Regex,
    pub format: String,
    pub has_year: bool,
}

/// Lexicon with its regexes built
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    pub lexicon: Lexicon,
    pub verb_cue: Regex,
    pub compound_separator: Option<Regex>,
    pub discourse_prefix: Option<Regex>,
    pub politeness_prefix: Option<Regex>,
    pub date_templates: Vec<CompiledTemplate>,
    /// Relative-day keywords, lowercased, in table order
    pub relative_days: Vec<RelativeDay>,
}

impl CompiledLexicon {
    /// Compile the built-in tables
    pub fn builtin() -> Result<Self, ExtractionError> {
        Lexicon::default().compile()
    }

    pub fn has_verb_cue(&self, text: &str) -> bool {
        self.verb_cue.is_match(text)
    }
}

/// Escaped alternation, longest entries first so leftmost-first matching
/// prefers "and then" over "and"
fn alternation(entries: &[String]) -> String {
    let mut sorted: Vec<&String> = entries.iter().filter(|e| !e.trim().is_empty()).collect();
    sorted.sort_by_key(|e| std::cmp::Reverse(e.chars().count()));
    sorted
        .into_iter()
        .map(|e| regex::escape(e.trim()))
        .collect::<Vec<_>>()
        .join("|")
}

fn prefix_regex(markers: &[String]) -> Result<Option<Regex>, ExtractionError> {
    if markers.is_empty() {
        return Ok(None);
    }
    build_regex(&format!(r"(?i)^(?:{})\s+", alternation(markers))).map(Some)
}

fn build_regex(pattern: &str) -> Result<Regex, ExtractionError> {
    Regex::new(pattern).map_err(|e| ExtractionError::InvalidLexicon(e.to_string()))
}
