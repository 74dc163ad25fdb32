use std::collections::HashMap;

use crate::models::ScoredCandidate;

/// Execute Stage 3: deduplicate by summary
///
/// Candidates sharing an identical summary collapse into the one with the
/// strictly highest score; on a tie the earlier one stays. Survivors keep
/// the order in which their summary first appeared.
pub fn deduplicate(candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<ScoredCandidate> = Vec::new();

    for candidate in candidates {
        match slots.get(&candidate.summary) {
            Some(&slot) => {
                if candidate.score > kept[slot].score {
                    kept[slot] = candidate;
                }
            }
            None => {
                slots.insert(candidate.summary.clone(), kept.len());
                kept.push(candidate);
            }
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(summary: &str, score: f64, source: &str) -> ScoredCandidate {
        ScoredCandidate {
            summary: summary.to_string(),
            score,
            source: source.to_string(),
        }
    }

    #[test]
    fn test_highest_score_wins() {
        let result = deduplicate(vec![
            scored("send the deck", 0.7, "a"),
            scored("fix the build", 0.8, "b"),
            scored("send the deck", 0.9, "c"),
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].summary, "send the deck");
        assert_eq!(result[0].score, 0.9);
        assert_eq!(result[0].source, "c");
        assert_eq!(result[1].summary, "fix the build");
    }

    #[test]
    fn test_tie_keeps_first() {
        let result = deduplicate(vec![
            scored("send the deck", 0.65, "first"),
            scored("send the deck", 0.65, "second"),
        ]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source, "first");
    }

    #[test]
    fn test_summaries_unique() {
        let input = vec![
            scored("a", 0.7, "1"),
            scored("b", 0.7, "2"),
            scored("a", 0.6, "3"),
            scored("b", 0.8, "4"),
            scored("c", 0.7, "5"),
        ];
        let result = deduplicate(input);
        let summaries: Vec<&str> = result.iter().map(|c| c.summary.as_str()).collect();

        assert_eq!(summaries, vec!["a", "b", "c"]);
        assert_eq!(result[1].score, 0.8);
    }
}
