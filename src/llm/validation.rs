use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::heuristics::{heuristic_labels, parse_explicit_date, parse_relative_keyword};
use crate::lexicon::CompiledLexicon;

/// Greedy match from the first `{` to the last `}`
static JSON_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Metadata returned by the generator, after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentPayload {
    pub assignee: Option<String>,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub labels: Vec<String>,
}

/// Locate and parse the JSON object in a completion.
///
/// A failed parse is retried once with single quotes swapped for double
/// quotes, which repairs single-quoted objects.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, ModelError> {
    let candidate = JSON_OBJECT
        .find(text)
        .ok_or_else(|| ModelError::MalformedOutput("no JSON object in completion".to_string()))?
        .as_str();

    let parsed = serde_json::from_str::<Value>(candidate)
        .or_else(|_| serde_json::from_str::<Value>(&candidate.replace('\'', "\"")))
        .map_err(|e| ModelError::MalformedOutput(e.to_string()))?;

    match parsed {
        Value::Object(map) => Ok(map),
        other => Err(ModelError::MalformedOutput(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Parse a completion into normalized metadata.
///
/// A `summary` key, if present, is ignored: the deduplicated summary always
/// wins over the model's rephrasing.
pub fn parse_enrichment(
    completion: &str,
    lexicon: &CompiledLexicon,
    today: NaiveDate,
) -> Result<EnrichmentPayload, ModelError> {
    let payload = extract_json_object(completion)?;

    Ok(EnrichmentPayload {
        assignee: normalize_text(payload.get("assignee")),
        due: normalize_due(payload.get("due"), lexicon, today).map(|d| d.to_string()),
        priority: normalize_text(payload.get("priority")),
        labels: normalize_labels(payload.get("labels"), lexicon),
    })
}

/// Stringify and trim; empty becomes `None`
pub fn normalize_text(value: Option<&Value>) -> Option<String> {
    let text = stringify(value?)?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Accept a list or a scalar; lowercase, hyphenate spaces, drop empties.
///
/// An empty result falls back to the heuristic labels of empty text.
pub fn normalize_labels(value: Option<&Value>, lexicon: &CompiledLexicon) -> Vec<String> {
    let items: Vec<&Value> = match value {
        None | Some(Value::Null) => vec![],
        Some(Value::Array(items)) => items.iter().collect(),
        Some(scalar) => vec![scalar],
    };

    let labels: Vec<String> = items
        .into_iter()
        .filter_map(stringify)
        .map(|s| s.trim().to_lowercase().replace(' ', "-"))
        .filter(|s| !s.is_empty())
        .collect();

    if labels.is_empty() {
        heuristic_labels("", lexicon)
    } else {
        labels
    }
}

/// Resolve a model-provided due value into a calendar date.
///
/// Null-like sentinels give `None`; numbers are Unix timestamps; objects
/// are searched under `date` then `due`; lists use their first element;
/// strings go through relative-keyword then explicit-date parsing.
pub fn normalize_due(
    value: Option<&Value>,
    lexicon: &CompiledLexicon,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let date = match value? {
        Value::Null | Value::Bool(_) => None,
        Value::Number(n) => {
            let secs = n.as_f64()?.floor();
            DateTime::from_timestamp(secs as i64, 0).map(|dt| dt.date_naive())
        }
        Value::Object(map) => {
            let nested = ["date", "due"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find(|v| is_truthy(v));
            normalize_due(nested, lexicon, today)
        }
        Value::Array(items) => normalize_due(items.first(), lexicon, today),
        Value::String(s) => {
            let text = s.trim();
            if matches!(text, "" | "null" | "None" | "none") {
                return None;
            }
            parse_relative_keyword(&text.to_lowercase(), lexicon, today)
                .or_else(|| parse_explicit_date(text, lexicon, today))
        }
    };
    // Outside four-digit years the date no longer renders as YYYY-MM-DD
    date.filter(|d| (1..=9999).contains(&d.year()))
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    }
}
