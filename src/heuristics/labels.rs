use crate::lexicon::CompiledLexicon;

/// Labels whose keywords occur in the text, sorted alphabetically
pub fn heuristic_labels(text: &str, lexicon: &CompiledLexicon) -> Vec<String> {
    let lower = text.to_lowercase();

    let mut labels: Vec<String> = lexicon
        .lexicon
        .labels
        .iter()
        .filter(|rule| rule.keywords.iter().any(|k| lower.contains(&k.to_lowercase())))
        .map(|rule| rule.label.clone())
        .collect();
    labels.sort();
    labels.dedup();
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_detected_and_sorted() {
        let lexicon = CompiledLexicon::builtin().unwrap();

        let labels = heuristic_labels("Развернуть сервис и описать API для клиента", &lexicon);
        assert_eq!(labels, vec!["development", "documentation", "sales"]);
    }

    #[test]
    fn test_no_labels() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        assert!(heuristic_labels("", &lexicon).is_empty());
        assert!(heuristic_labels("позвонить маме", &lexicon).is_empty());
    }
}
