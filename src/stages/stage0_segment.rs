use std::sync::LazyLock;

use regex::{Matches, Regex};

use crate::models::Language;

/// Sentence terminators followed by whitespace, newlines, bullets and
/// stand-alone hyphen bullets
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+|[\n\r]+|•\s*| - ").unwrap());

/// Segments of this many characters or fewer are dropped
const MIN_SENTENCE_CHARS: usize = 2;

/// Lazy iterator over the sentences of a transcript, in document order
pub struct Sentences<'a> {
    text: &'a str,
    boundaries: Matches<'static, 'a>,
    cursor: usize,
    exhausted: bool,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while !self.exhausted {
            let piece = match self.boundaries.next() {
                Some(m) => {
                    // Keep the terminator with the sentence it ends
                    let end = if m.as_str().starts_with(['.', '!', '?']) {
                        m.start() + 1
                    } else {
                        m.start()
                    };
                    let piece = &self.text[self.cursor..end];
                    self.cursor = m.end();
                    piece
                }
                None => {
                    self.exhausted = true;
                    &self.text[self.cursor..]
                }
            };

            let cleaned = trim_sentence(piece);
            if cleaned.chars().count() > MIN_SENTENCE_CHARS {
                return Some(cleaned);
            }
        }
        None
    }
}

fn trim_sentence(piece: &str) -> &str {
    piece.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '—' | '•'))
}

/// Split a transcript into trimmed sentences
pub fn split_sentences(text: &str) -> Sentences<'_> {
    let text = text.trim();
    Sentences {
        text,
        boundaries: SENTENCE_BOUNDARY.find_iter(text),
        cursor: 0,
        exhausted: false,
    }
}

/// Classify a whole transcript as Russian or English.
///
/// Counts Cyrillic against Latin letters; ties go to Russian.
pub fn detect_language(text: &str) -> Language {
    let mut cyrillic = 0usize;
    let mut latin = 0usize;

    for ch in text.chars() {
        let lower = ch.to_lowercase().next().unwrap_or(ch);
        if ('а'..='я').contains(&lower) || lower == 'ё' {
            cyrillic += 1;
        } else if lower.is_ascii_lowercase() {
            latin += 1;
        }
    }

    if cyrillic >= latin {
        Language::Ru
    } else {
        Language::En
    }
}
