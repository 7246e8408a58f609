//! Tokenization helpers shared by the lexical index and score fusion

use unicode_segmentation::UnicodeSegmentation;

/// Split text into lowercased Unicode words.
///
/// Used by the BM25 index, where word boundaries should respect scripts
/// beyond ASCII.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// Split text into lowercased alphanumeric terms.
///
/// Anything outside `[a-z0-9]` separates terms. Used for lexical overlap
/// and hybrid score fusion, where the two sides must agree on a coarse,
/// punctuation-free vocabulary.
pub fn terms(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases() {
        let tokens = tokenize("The Cat SAT on the mat.");
        assert_eq!(tokens, vec!["the", "cat", "sat", "on", "the", "mat"]);
    }

    #[test]
    fn test_tokenize_unicode() {
        let tokens = tokenize("Größe straße");
        assert_eq!(tokens, vec!["größe", "straße"]);
    }

    #[test]
    fn test_terms_strips_punctuation() {
        let t = terms("What's the rate, 10.5%?");
        assert_eq!(t, vec!["what", "s", "the", "rate", "10", "5"]);
    }

    #[test]
    fn test_terms_empty_input() {
        assert!(terms("  ...  ").is_empty());
        assert!(terms("").is_empty());
    }
}
