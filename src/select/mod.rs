pub mod external;
pub mod linguistic;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::passage::Token;

pub use external::{WordSource, parse_word_list, strip_code_fence};
pub use linguistic::is_eligible;

/// Longest slice of a raw model response carried by a parse error.
pub const PREVIEW_CHARS: usize = 200;

/// Tokens chosen to become gaps, ordered by their position in the passage.
/// Gap `i` is the `i`-th token of the set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GapSet {
    tokens: Vec<Token>,
}

impl GapSet {
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        tokens.sort_by_key(|t| t.start);
        tokens.dedup_by_key(|t| t.start);
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn surfaces(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionNotice {
    /// Fewer tokens were eligible than requested, so all of them were used.
    Clamped { requested: usize, available: usize },
    /// The passage has text but nothing in it can become a gap.
    NoGapsPossible,
}

impl fmt::Display for SelectionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionNotice::Clamped {
                requested,
                available,
            } => write!(
                f,
                "Only {available} of the {requested} requested words could be hidden; the gap count was adjusted."
            ),
            SelectionNotice::NoGapsPossible => write!(
                f,
                "No words in this passage can be hidden. Try a longer passage."
            ),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub gaps: GapSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<SelectionNotice>,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn no_gaps_possible() -> Self {
        Self {
            gaps: GapSet::default(),
            notice: Some(SelectionNotice::NoGapsPossible),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("model response is not a list of words: {preview}")]
pub struct SelectionParseError {
    pub preview: String,
}

impl SelectionParseError {
    pub fn from_response(raw: &str) -> Self {
        Self {
            preview: crate::utils::truncate_preview(raw, PREVIEW_CHARS),
        }
    }
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("the number of gaps must be at least 1, got {0}")]
    InvalidArgument(usize),
    #[error(transparent)]
    Parse(#[from] SelectionParseError),
    #[error("word suggestion request failed: {0:#}")]
    Service(anyhow::Error),
}

pub fn validate_target(target_count: usize) -> Result<(), SelectionError> {
    if target_count == 0 {
        return Err(SelectionError::InvalidArgument(target_count));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_set_orders_by_position_and_drops_duplicates() {
        let gaps = GapSet::from_tokens(vec![
            Token::new("mat", 5, 19, 22),
            Token::new("cat", 1, 4, 7),
            Token::new("cat", 1, 4, 7),
        ]);
        assert_eq!(gaps.surfaces(), vec!["cat", "mat"]);
        assert_eq!(gaps.len(), 2);
    }

    #[test]
    fn zero_target_is_rejected() {
        assert!(matches!(
            validate_target(0),
            Err(SelectionError::InvalidArgument(0))
        ));
        assert!(validate_target(1).is_ok());
    }

    #[test]
    fn notices_read_well() {
        let clamped = SelectionNotice::Clamped {
            requested: 10,
            available: 3,
        };
        assert!(clamped.to_string().starts_with("Only 3 of the 10"));
        assert!(
            SelectionNotice::NoGapsPossible
                .to_string()
                .contains("No words")
        );
    }

    #[test]
    fn parse_error_preview_is_truncated() {
        let raw = "x".repeat(PREVIEW_CHARS * 2);
        let err = SelectionParseError::from_response(&raw);
        assert!(err.preview.chars().count() < raw.len());
        assert!(err.preview.starts_with(&"x".repeat(PREVIEW_CHARS)));
    }
}
