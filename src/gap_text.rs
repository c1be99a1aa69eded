use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::grade::AnswerSet;
use crate::passage::{normalize, words};
use crate::select::GapSet;

/// Marker shown in place of gap `index`.
pub fn placeholder(index: usize) -> String {
    format!("[___{index}___]")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Text(String),
    Gap(usize),
}

/// A passage with its hidden words cut out. Text between gaps is kept byte
/// for byte; consecutive text is always merged into one segment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayDocument {
    segments: Vec<Segment>,
}

impl DisplayDocument {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Text(text.to_string()));
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn gap_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Gap(_)))
            .count()
    }

    pub fn gap_indices(&self) -> Vec<usize> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Gap(i) => Some(*i),
                Segment::Text(_) => None,
            })
            .collect()
    }

    pub fn fill<F, S>(&self, mut gap: F) -> String
    where
        F: FnMut(usize) -> S,
        S: AsRef<str>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Gap(i) => out.push_str(gap(*i).as_ref()),
            }
        }
        out
    }

    pub fn render(&self) -> String {
        self.fill(placeholder)
    }

    /// Puts `answers[i]` back into gap `i`.
    pub fn restore(&self, answers: &[String]) -> String {
        self.fill(|i| answers.get(i).map(String::as_str).unwrap_or(""))
    }

    /// Recovers what a user typed into each placeholder of a copy of
    /// [`render`](Self::render). Each gap ends where the next piece of
    /// literal text starts. Untouched placeholders and gaps that cannot be
    /// aligned are left unanswered.
    pub fn extract_answers(&self, filled: &str) -> AnswerSet {
        let mut answers = AnswerSet::default();
        let mut rest = filled;

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Text(_) => {
                    let anchor = self.anchor(i);
                    let Some(pos) = rest.find(anchor) else {
                        return answers;
                    };
                    rest = &rest[pos + anchor.len()..];
                }
                Segment::Gap(index) => {
                    let typed = match self.segments.get(i + 1) {
                        Some(Segment::Text(_)) if !self.anchor(i + 1).is_empty() => {
                            match rest.find(self.anchor(i + 1)) {
                                Some(pos) => &rest[..pos],
                                None => return answers,
                            }
                        }
                        Some(Segment::Gap(_)) => "",
                        _ => rest,
                    };
                    rest = &rest[typed.len()..];

                    let typed = typed.trim();
                    if !typed.is_empty() && typed != placeholder(*index) {
                        answers.set(*index, typed);
                    }
                }
            }
        }
        answers
    }

    /// Literal text of segment `i` as it should appear in a pasted copy.
    /// Leading and trailing whitespace of the whole document is not
    /// required to survive the copy.
    fn anchor(&self, i: usize) -> &str {
        let Some(Segment::Text(text)) = self.segments.get(i) else {
            return "";
        };
        let mut anchor = text.as_str();
        if i == 0 {
            anchor = anchor.trim_start();
        }
        if i + 1 == self.segments.len() {
            anchor = anchor.trim_end();
        }
        anchor
    }
}

/// A display document together with the hidden words, `answers[i]` being
/// the original text of gap `i`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapText {
    pub document: DisplayDocument,
    pub answers: Vec<String>,
}

impl GapText {
    /// Hides the first passage occurrence of every word in `gap_tokens`,
    /// compared case-insensitively. Gaps are numbered in passage order.
    pub fn build<S: AsRef<str>>(passage: &str, gap_tokens: &[S]) -> Self {
        let mut pending: HashSet<String> = gap_tokens
            .iter()
            .map(|t| normalize(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();

        let mut document = DisplayDocument::default();
        let mut answers = Vec::new();
        let mut cursor = 0;

        for token in words(passage) {
            if pending.is_empty() {
                break;
            }
            if !pending.remove(&token.normalized()) {
                continue;
            }
            document.push_text(&passage[cursor..token.start]);
            document.segments.push(Segment::Gap(answers.len()));
            cursor = token.end;
            answers.push(token.text);
        }
        document.push_text(&passage[cursor..]);

        Self { document, answers }
    }

    /// Hides exactly the token spans of `gaps`, so a repeated word can be
    /// hidden at a later occurrence. Spans that overlap an earlier gap or
    /// fall outside the passage are ignored.
    pub fn from_gap_set(passage: &str, gaps: &GapSet) -> Self {
        let mut document = DisplayDocument::default();
        let mut answers = Vec::new();
        let mut cursor = 0;

        for token in gaps.iter() {
            if token.start < cursor {
                continue;
            }
            let (Some(before), Some(hidden)) = (
                passage.get(cursor..token.start),
                passage.get(token.start..token.end),
            ) else {
                continue;
            };
            if hidden.is_empty() {
                continue;
            }
            document.push_text(before);
            document.segments.push(Segment::Gap(answers.len()));
            answers.push(hidden.to_string());
            cursor = token.end;
        }
        document.push_text(&passage[cursor..]);

        Self { document, answers }
    }

    pub fn gap_count(&self) -> usize {
        self.answers.len()
    }

    pub fn restore(&self) -> String {
        self.document.restore(&self.answers)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::passage::{HeuristicTagger, Token};
    use crate::select::linguistic;

    const SAMPLE: &str = "The book which I bought yesterday is very interesting.";

    #[test]
    fn renders_placeholders_in_passage_order() {
        let built = GapText::build(SAMPLE, &["interesting", "which"]);
        assert_eq!(
            built.document.render(),
            "The book [___0___] I bought yesterday is very [___1___]."
        );
        assert_eq!(built.answers, vec!["which", "interesting"]);
    }

    #[test]
    fn first_occurrence_wins() {
        let built = GapText::build("the cat sat on the mat", &["the"]);
        assert_eq!(built.document.render(), "[___0___] cat sat on the mat");
        assert_eq!(built.answers, vec!["the"]);

        let built = GapText::build("the cat sat on the mat", &["the", "THE"]);
        assert_eq!(built.gap_count(), 1);
    }

    #[test]
    fn scrambled_tokens_follow_passage_order() {
        let built = GapText::build("the cat sat on the mat", &["mat", "cat"]);
        assert_eq!(built.answers, vec!["cat", "mat"]);
        assert_eq!(
            built.document.segments(),
            &[
                Segment::Text("the ".into()),
                Segment::Gap(0),
                Segment::Text(" sat on the ".into()),
                Segment::Gap(1),
            ]
        );
    }

    #[test]
    fn matching_ignores_case_but_answers_keep_it() {
        let built = GapText::build("Which one? The One.", &["which", "one"]);
        assert_eq!(built.answers, vec!["Which", "one"]);
        assert_eq!(built.document.render(), "[___0___] [___1___]? The One.");
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let built = GapText::build("the cat sat", &["dog", "at", ""]);
        assert_eq!(built.gap_count(), 0);
        assert_eq!(built.document.render(), "the cat sat");
        assert_eq!(
            built.document.segments(),
            &[Segment::Text("the cat sat".into())]
        );
    }

    #[test]
    fn empty_passage() {
        let built = GapText::build("", &["cat"]);
        assert!(built.document.segments().is_empty());
        assert!(built.answers.is_empty());
    }

    #[test]
    fn positional_build_hides_later_occurrences() {
        let passage = "the cat sat on the mat";
        let gaps = GapSet::from_tokens(vec![Token::new("the", 4, 15, 18)]);
        let built = GapText::from_gap_set(passage, &gaps);
        assert_eq!(built.document.render(), "the cat sat on [___0___] mat");
        assert_eq!(built.restore(), passage);
    }

    #[test]
    fn positional_build_from_linguistic_selection() {
        let candidates = linguistic::candidates(SAMPLE, &HeuristicTagger);
        let built = GapText::from_gap_set(SAMPLE, &GapSet::from_tokens(candidates));
        assert_eq!(
            built.document.render(),
            "The book [___0___] I [___1___] [___2___] is very [___3___]."
        );
        assert_eq!(built.restore(), SAMPLE);
    }

    #[test]
    fn positional_build_skips_bad_spans() {
        let gaps = GapSet::from_tokens(vec![
            Token::new("cat", 1, 4, 7),
            Token::new("at", 2, 5, 7),
            Token::new("far", 9, 90, 93),
        ]);
        let built = GapText::from_gap_set("the cat", &gaps);
        assert_eq!(built.answers, vec!["cat"]);
    }

    #[test]
    fn extracts_pasted_answers() {
        let built = GapText::build(SAMPLE, &["which", "bought", "interesting"]);
        let document = &built.document;

        let answers = document.extract_answers(SAMPLE);
        assert_eq!(answers.get(0), Some("which"));
        assert_eq!(answers.get(1), Some("bought"));
        assert_eq!(answers.get(2), Some("interesting"));

        let partial =
            document.extract_answers("The book that I [___1___] yesterday is very boring.\n");
        assert_eq!(partial.get(0), Some("that"));
        assert_eq!(partial.get(1), None);
        assert_eq!(partial.get(2), Some("boring"));

        let untouched = document.extract_answers(&document.render());
        assert_eq!(untouched.answered_count(), 0);
    }

    #[test]
    fn extraction_stops_when_text_was_edited() {
        let built = GapText::build("the cat sat on the mat", &["cat", "mat"]);
        let answers = built
            .document
            .extract_answers("the dog slept on a rug");
        assert_eq!(answers.answered_count(), 0);
    }

    fn passage_and_tokens() -> impl Strategy<Value = (String, Vec<String>)> {
        ("[a-zA-Z ,.!?\n]{0,80}", prop::collection::vec(any::<prop::sample::Index>(), 0..6))
            .prop_map(|(passage, picks)| {
                let tokens = words(&passage);
                let chosen = if tokens.is_empty() {
                    Vec::new()
                } else {
                    picks
                        .iter()
                        .map(|i| tokens[i.index(tokens.len())].text.clone())
                        .collect()
                };
                (passage, chosen)
            })
    }

    proptest! {
        #[test]
        fn placeholders_are_contiguous((passage, tokens) in passage_and_tokens()) {
            let built = GapText::build(&passage, &tokens);
            let indices = built.document.gap_indices();
            prop_assert_eq!(indices.len(), built.answers.len());
            prop_assert_eq!(indices, (0..built.answers.len()).collect::<Vec<_>>());
        }

        #[test]
        fn restoring_answers_reproduces_passage((passage, tokens) in passage_and_tokens()) {
            let built = GapText::build(&passage, &tokens);
            prop_assert_eq!(built.restore(), passage);
        }

        #[test]
        fn arbitrary_tokens_never_break_the_passage(
            passage in "\\PC{0,60}",
            tokens in prop::collection::vec("\\PC{0,8}", 0..5),
        ) {
            let built = GapText::build(&passage, &tokens);
            prop_assert_eq!(built.restore(), passage);
            prop_assert_eq!(built.document.gap_count(), built.answers.len());
        }

        #[test]
        fn filled_render_extracts_every_answer((passage, tokens) in passage_and_tokens()) {
            let built = GapText::build(&passage, &tokens);
            let answers = built.document.extract_answers(&built.restore());
            for (i, expected) in built.answers.iter().enumerate() {
                prop_assert_eq!(answers.get(i), Some(expected.as_str()));
            }
        }
    }
}
