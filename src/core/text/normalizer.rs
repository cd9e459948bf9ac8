// Text cleanup shared by the classifier and the knowledge base.
//
// Normalization happens at query time, never at storage time: learned entries
// keep the exact text the user typed.

use std::collections::HashSet;

/// Cleans and tokenizes free text.
///
/// The stop-word set is fixed at construction and never reloaded.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    stop_words: HashSet<String>,
}

impl TextNormalizer {
    pub fn new<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Stop words are compared against normalized tokens, so normalize them too.
        let stop_words = stop_words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        Self { stop_words }
    }

    pub fn normalize(&self, text: &str) -> String {
        normalize(text)
    }

    /// Normalizes `text`, splits on whitespace and drops stop words.
    ///
    /// Tokens keep their order of appearance and duplicates are retained.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        normalize(text)
            .split_whitespace()
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }
}

/// Strips ASCII punctuation (except `?` and `!`), collapses whitespace runs to a
/// single space, trims and lowercases.
///
/// Punctuation is removed before whitespace is collapsed so that
/// `normalize(normalize(x)) == normalize(x)` holds for every input.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !is_stripped_punctuation(*c)).collect();

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_stripped_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() && c != '?' && c != '!'
}
