use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::tagger::TokenAttrs;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+(?:['’]\w+)*").unwrap());

/// One occurrence of a word-like unit in a passage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    /// Position in the tokenization sequence the token came from.
    pub index: usize,
    /// Byte offsets into the passage.
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<TokenAttrs>,
}

impl Token {
    pub fn new(text: impl Into<String>, index: usize, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            index,
            start,
            end,
            attrs: None,
        }
    }

    pub fn with_attrs(mut self, attrs: TokenAttrs) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn normalized(&self) -> String {
        normalize(&self.text)
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

pub fn normalize(word: &str) -> String {
    word.to_lowercase()
}

pub fn is_word(text: &str) -> bool {
    WORD_RE
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}

pub fn words(passage: &str) -> Vec<Token> {
    WORD_RE
        .find_iter(passage)
        .enumerate()
        .map(|(index, m)| Token::new(m.as_str(), index, m.start(), m.end()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_keep_offsets_and_order() {
        let passage = "The cat, which sat.";
        let tokens = words(passage);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["The", "cat", "which", "sat"]);

        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.index, i);
            assert_eq!(&passage[token.start..token.end], token.text);
        }
    }

    #[test]
    fn contractions_stay_whole() {
        let tokens = words("I don't know what you’re doing");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["I", "don't", "know", "what", "you’re", "doing"]);
    }

    #[test]
    fn unicode_words() {
        let tokens = words("Café über 東京!");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "東京");
        assert_eq!(tokens[2].char_len(), 2);
    }

    #[test]
    fn is_word_rejects_partial_matches() {
        assert!(is_word("which"));
        assert!(is_word("isn't"));
        assert!(!is_word("two words"));
        assert!(!is_word("well-known"));
        assert!(!is_word(""));
    }
}
