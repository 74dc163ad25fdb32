pub mod assignee;
pub mod dates;
pub mod labels;
pub mod priority;

pub use assignee::*;
pub use dates::*;
pub use labels::*;
pub use priority::*;

use chrono::NaiveDate;

use crate::lexicon::CompiledLexicon;
use crate::models::ActionItem;

/// Word cap applied to summaries on the fallback path
pub const FALLBACK_SUMMARY_WORDS: usize = 20;

/// Enrich an item without any model
///
/// Deterministic chain used when no generator is loaded or the generator
/// failed for this item:
/// 1. Summary capped at 20 words
/// 2. Priority from urgency/deferral keywords in the summary
/// 3. Due date from relative keywords, numeric dates, then weekday names
/// 4. Assignee from the first capitalized non-pronoun word
/// 5. Labels from the keyword lexicon over summary and context
pub fn fallback_enrich(
    item: &ActionItem,
    context: &str,
    lexicon: &CompiledLexicon,
    today: NaiveDate,
) -> ActionItem {
    ActionItem {
        summary: fallback_summary(&item.summary),
        confidence: item.confidence,
        source: item.source.clone(),
        assignee: heuristic_assignee(&item.summary, context, lexicon),
        due: heuristic_due(&item.summary, context, lexicon, today).map(|d| d.to_string()),
        priority: Some(fallback_priority(&item.summary, lexicon)),
        labels: heuristic_labels(&format!("{} {}", item.summary, context), lexicon),
    }
}

/// Trim and keep at most the first 20 words
pub fn fallback_summary(summary: &str) -> String {
    let summary = summary.trim();
    let words: Vec<&str> = summary.split_whitespace().collect();
    if words.len() <= FALLBACK_SUMMARY_WORDS {
        summary.to_string()
    } else {
        words[..FALLBACK_SUMMARY_WORDS].join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_enrich() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let item = ActionItem::new("срочно проверить деплой", 0.8, Some("src".to_string()));

        let enriched = fallback_enrich(&item, "Олег, проверь деплой завтра", &lexicon, today);

        assert_eq!(enriched.summary, "срочно проверить деплой");
        assert_eq!(enriched.confidence, 0.8);
        assert_eq!(enriched.source.as_deref(), Some("src"));
        assert_eq!(enriched.assignee.as_deref(), Some("Олег"));
        assert_eq!(enriched.due.as_deref(), Some("2025-03-11"));
        assert_eq!(enriched.priority.as_deref(), Some("High"));
        assert!(enriched.labels.is_empty());
    }

    #[test]
    fn test_fallback_summary_caps_words() {
        let long = (1..=25).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let summary = fallback_summary(&long);

        assert_eq!(summary.split_whitespace().count(), 20);
        assert!(summary.ends_with("w20"));
        assert_eq!(fallback_summary("  keep   spacing  "), "keep   spacing");
    }
}
