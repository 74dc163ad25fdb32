use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::CompiledLexicon;

/// A capitalized word, Latin or Cyrillic, optionally `@`-prefixed
static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@?[A-ZА-ЯЁ][a-zа-яё]+").unwrap());

/// Guess the assignee: the first capitalized word of the summary, else the
/// first capitalized word of the context. A stoplisted pronoun in first
/// position disqualifies its chunk.
pub fn heuristic_assignee(
    summary: &str,
    context: &str,
    lexicon: &CompiledLexicon,
) -> Option<String> {
    let stoplist = &lexicon.lexicon.assignee_stoplist;

    [summary, context]
        .into_iter()
        .filter_map(|chunk| CAPITALIZED_WORD.find(chunk))
        .map(|m| m.as_str().trim_start_matches('@'))
        .find(|name| {
            let lower = name.to_lowercase();
            !stoplist.iter().any(|s| s.to_lowercase() == lower)
        })
        .map(str::to_string)
}
