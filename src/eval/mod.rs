use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExtractionError;
use crate::models::ActionItem;
use crate::pipeline::TaskExtractor;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9а-яё]+").unwrap());

/// One labelled transcript.
///
/// Predicted and expected items are matched on their normalised summary;
/// metadata is compared only on matched items.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalSample {
    pub transcript: String,
    #[serde(default)]
    pub expected: Vec<ExpectedItem>,
}

/// A hand-labelled action item. Absent fields are not scored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpectedItem {
    pub summary: Option<String>,
    pub assignee: Option<String>,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SampleMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub assignee_accuracy: f64,
    pub due_accuracy: f64,
    pub priority_accuracy: f64,
    pub labels_accuracy: f64,
    pub predicted_tasks: f64,
    pub expected_tasks: f64,
}

/// Arithmetic means over all samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AggregateMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub assignee_accuracy: f64,
    pub due_accuracy: f64,
    pub priority_accuracy: f64,
    pub labels_accuracy: f64,
    pub avg_predicted_tasks: f64,
    pub avg_expected_tasks: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub samples: Vec<SampleMetrics>,
    pub aggregate: AggregateMetrics,
}

/// Lowercase, collapse every run of non-alphanumerics into one space, trim
pub fn normalise(text: &str) -> String {
    NON_WORD
        .replace_all(&text.to_lowercase(), " ")
        .trim()
        .to_string()
}

pub fn f1(precision: f64, recall: f64) -> f64 {
    if precision == 0.0 || recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}

/// Compare one sample's predictions with its expectations
pub fn score_sample(predicted: &[ActionItem], expected: &[ExpectedItem]) -> SampleMetrics {
    let predicted_map: HashMap<String, &ActionItem> = predicted
        .iter()
        .map(|item| (normalise(&item.summary), item))
        .collect();
    let expected_map: HashMap<String, &ExpectedItem> = expected
        .iter()
        .map(|item| (item.summary.as_deref().map(normalise).unwrap_or_default(), item))
        .collect();

    let predicted_keys: HashSet<&str> = predicted_map
        .keys()
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .collect();
    let expected_keys: HashSet<&str> = expected_map
        .keys()
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .collect();
    let matched: Vec<&str> = predicted_keys.intersection(&expected_keys).copied().collect();

    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(matched.len(), predicted_keys.len());
    let recall = ratio(matched.len(), expected_keys.len());

    let accuracy = |field: Field| {
        let hits = matched
            .iter()
            .filter(|key| field.matches(predicted_map[**key], expected_map[**key]) == Some(true))
            .count();
        ratio(hits, matched.len())
    };

    SampleMetrics {
        precision,
        recall,
        f1: f1(precision, recall),
        assignee_accuracy: accuracy(Field::Assignee),
        due_accuracy: accuracy(Field::Due),
        priority_accuracy: accuracy(Field::Priority),
        labels_accuracy: accuracy(Field::Labels),
        predicted_tasks: predicted_keys.len() as f64,
        expected_tasks: expected_keys.len() as f64,
    }
}

#[derive(Clone, Copy)]
enum Field {
    Assignee,
    Due,
    Priority,
    Labels,
}

impl Field {
    /// `None` when nothing is expected for the field
    fn matches(self, predicted: &ActionItem, expected: &ExpectedItem) -> Option<bool> {
        match self {
            Field::Assignee => text_matches(predicted.assignee.as_deref(), expected.assignee.as_deref()),
            Field::Due => text_matches(predicted.due.as_deref(), expected.due.as_deref()),
            Field::Priority => text_matches(predicted.priority.as_deref(), expected.priority.as_deref()),
            Field::Labels => labels_overlap(&predicted.labels, expected.labels.as_deref()),
        }
    }
}

fn text_matches(predicted: Option<&str>, expected: Option<&str>) -> Option<bool> {
    let expected = expected?;
    Some(normalise(predicted.unwrap_or_default()) == normalise(expected))
}

fn labels_overlap(predicted: &[String], expected: Option<&[String]>) -> Option<bool> {
    let expected: HashSet<String> = expected?.iter().map(|l| normalise(l)).collect();
    Some(predicted.iter().any(|l| expected.contains(&normalise(l))))
}

pub fn aggregate(samples: &[SampleMetrics]) -> AggregateMetrics {
    let mean = |field: fn(&SampleMetrics) -> f64| {
        if samples.is_empty() {
            0.0
        } else {
            samples.iter().map(field).sum::<f64>() / samples.len() as f64
        }
    };

    AggregateMetrics {
        precision: mean(|m| m.precision),
        recall: mean(|m| m.recall),
        f1: mean(|m| m.f1),
        assignee_accuracy: mean(|m| m.assignee_accuracy),
        due_accuracy: mean(|m| m.due_accuracy),
        priority_accuracy: mean(|m| m.priority_accuracy),
        labels_accuracy: mean(|m| m.labels_accuracy),
        avg_predicted_tasks: mean(|m| m.predicted_tasks),
        avg_expected_tasks: mean(|m| m.expected_tasks),
    }
}

/// Run the extractor over every sample and score it
pub async fn evaluate_dataset(
    extractor: &TaskExtractor,
    samples: &[EvalSample],
    today: NaiveDate,
) -> Result<EvaluationReport, ExtractionError> {
    let mut metrics = Vec::with_capacity(samples.len());

    for (index, sample) in samples.iter().enumerate() {
        let predicted = extractor.extract_tasks_on(&sample.transcript, today).await?;
        let sample_metrics = score_sample(&predicted, &sample.expected);
        info!(
            "Sample {}: precision {:.2}, recall {:.2}",
            index, sample_metrics.precision, sample_metrics.recall
        );
        metrics.push(sample_metrics);
    }

    let aggregate = aggregate(&metrics);
    Ok(EvaluationReport {
        samples: metrics,
        aggregate,
    })
}
