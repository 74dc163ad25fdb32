use tracing::debug;

use crate::lexicon::CompiledLexicon;
use crate::models::{Candidate, MAX_CANDIDATE_WORDS};

use super::stage0_segment::split_sentences;

/// Fragments shorter than this (in characters) are not candidates
const MIN_CANDIDATE_CHARS: usize = 3;

/// Execute Stage 1: candidate generation
///
/// For every sentence carrying a verb cue:
/// 1. Split compound clauses on conjunctions
/// 2. Strip leading discourse markers ("нужно", "let's", ...)
/// 3. Re-anchor the fragment at its first verb cue
/// 4. Cut at the first terminal punctuation and cap the word count
///
/// Duplicates are kept; deduplication happens after scoring.
pub fn candidate_actions(text: &str, lexicon: &CompiledLexicon) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for sentence in split_sentences(text) {
        if !lexicon.has_verb_cue(sentence) {
            debug!("No verb cue, skipping sentence: {:?}", sentence);
            continue;
        }

        for fragment in expand_compounds(sentence, lexicon) {
            if let Some(text) = normalize_fragment(fragment, lexicon) {
                candidates.push(Candidate { text });
            }
        }
    }

    candidates
}

/// Split a sentence into independent clause fragments
pub fn expand_compounds<'a>(sentence: &'a str, lexicon: &CompiledLexicon) -> Vec<&'a str> {
    let Some(separator) = &lexicon.compound_separator else {
        let trimmed = trim_fragment(sentence);
        return if trimmed.is_empty() { vec![] } else { vec![trimmed] };
    };

    separator
        .split(sentence)
        .map(trim_fragment)
        .filter(|part| !part.is_empty())
        .filter(|part| {
            !separator
                .find(part)
                .is_some_and(|m| m.start() == 0 && m.end() == part.len())
        })
        .collect()
}

fn normalize_fragment(fragment: &str, lexicon: &CompiledLexicon) -> Option<String> {
    let mut text = fragment;

    if let Some(prefix) = &lexicon.discourse_prefix {
        while let Some(m) = prefix.find(text) {
            text = &text[m.end()..];
        }
    }

    if let Some(cue) = lexicon.verb_cue.find(text) {
        text = &text[cue.start()..];
    }

    let text = text.split(['.', ';', '!', '?']).next().unwrap_or_default();
    let text = trim_fragment(text);

    let words: Vec<&str> = text.split_whitespace().collect();
    let normalized = if words.len() > MAX_CANDIDATE_WORDS {
        words[..MAX_CANDIDATE_WORDS].join(" ")
    } else {
        text.to_string()
    };

    (normalized.chars().count() >= MIN_CANDIDATE_CHARS).then_some(normalized)
}

fn trim_fragment(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':' | '—' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        let lexicon = CompiledLexicon::builtin().unwrap();
        candidate_actions(text, &lexicon)
            .into_iter()
            .map(|c| c.text)
            .collect()
    }

    #[test]
    fn test_meeting_excerpt() {
        let candidates = texts("Нужно подготовить отчёт к пятнице. Также свяжись с клиентом.");
        assert_eq!(candidates, vec!["подготовить отчёт к пятнице", "свяжись с клиентом"]);
    }

    #[test]
    fn test_sentence_without_verb_cue_dropped() {
        assert!(texts("Встреча прошла хорошо.").is_empty());
    }

    #[test]
    fn test_compound_sentence_split() {
        let candidates = texts("Давайте обновим документацию и отправим её команде.");
        assert_eq!(candidates, vec!["обновим документацию", "отправим её команде"]);
    }

    #[test]
    fn test_english_compound_and_discourse_marker() {
        let candidates = texts("We need to review the budget and then send it to finance.");
        assert_eq!(candidates, vec!["review the budget", "send it to finance"]);
    }

    #[test]
    fn test_reanchored_at_verb() {
        let candidates = texts("Кстати, Иван, проверь логи сервера!");
        assert_eq!(candidates, vec!["проверь логи сервера"]);
    }

    #[test]
    fn test_long_fragment_capped() {
        let text = "Prepare a very long report covering every single metric we collected over the whole past quarter in great detail for the board";
        let candidates = texts(text);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].split_whitespace().count(), MAX_CANDIDATE_WORDS);
        assert!(candidates[0].starts_with("Prepare a very long report"));
    }

    #[test]
    fn test_duplicates_permitted() {
        let candidates = texts("Fix the build. Fix the build.");
        assert_eq!(candidates, vec!["Fix the build", "Fix the build"]);
    }

    #[test]
    fn test_separator_only_fragments_dropped() {
        let lexicon = CompiledLexicon::builtin().unwrap();
        let parts = expand_compounds("send the deck and and then call Anna", &lexicon);
        assert_eq!(parts, vec!["send the deck", "call Anna"]);
    }
}
