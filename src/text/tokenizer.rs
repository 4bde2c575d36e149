// src/text/tokenizer.rs

//! Word extraction for email subjects.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// ASCII words, optionally followed by one of the common English contraction suffixes.
static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+('(s|d|t|ve|m))?").expect("word pattern is valid"));

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer
    }

    /// Distinct lowercased terms of `text`. Repeats collapse to a single entry.
    pub fn tokenize(&self, text: &str) -> BTreeSet<String> {
        WORD_REGEX
            .find_iter(text)
            .map(|m| m.as_str().to_ascii_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<String> {
        Tokenizer::new().tokenize(text).into_iter().collect()
    }

    #[test]
    fn lowercases_and_splits_on_non_letters() {
        assert_eq!(terms("FREE money-now!!"), vec!["free", "money", "now"]);
        assert_eq!(terms("win $1000 today"), vec!["today", "win"]);
    }

    #[test]
    fn keeps_known_contractions() {
        assert_eq!(
            terms("It's time, don't wait, we've got I'm in"),
            vec!["don't", "got", "i'm", "in", "it's", "time", "wait", "we've"]
        );
    }

    #[test]
    fn unknown_suffix_is_split_off() {
        // "'ll" is not one of the recognised contractions.
        assert_eq!(terms("we'll"), vec!["ll", "we"]);
    }

    #[test]
    fn non_ascii_letters_are_separators() {
        assert_eq!(terms("café olé"), vec!["caf", "ol"]);
    }

    #[test]
    fn empty_and_whitespace_yield_nothing() {
        assert!(terms("").is_empty());
        assert!(terms("   \t\n").is_empty());
        assert!(terms("123 !!! ...").is_empty());
    }

    #[test]
    fn repeated_text_gives_the_same_set() {
        let tokenizer = Tokenizer::new();
        let text = "Cheap meds cheap MEDS now";
        let once = tokenizer.tokenize(text);
        assert_eq!(once, tokenizer.tokenize(text));
        assert_eq!(once, tokenizer.tokenize(&format!("{} {}", text, text)));
        assert_eq!(once.len(), 3);
    }
}
