//! State of one quiz between "generate" and the next "generate".
//!
//! A session owns the generated gap text and everything the user does with
//! it: words picked from the bank and dropped into gaps, choices made from a
//! list, typed or pasted answers. Scores are always recomputed from the
//! current answers.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::gap_text::{DisplayDocument, GapText};
use crate::grade::{AnswerSet, CaseSensitivity, ScoreResult, grade};

/// A hidden word waiting in the bank. `id` is the gap it was cut from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankWord {
    pub id: usize,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct QuizSession {
    gap_text: GapText,
    bank: Vec<BankWord>,
    placements: BTreeMap<usize, BankWord>,
    answers: AnswerSet,
    selected_word: Option<usize>,
    show_results: bool,
    case: CaseSensitivity,
}

impl QuizSession {
    pub fn new(gap_text: GapText, case: CaseSensitivity) -> Self {
        let bank = gap_text
            .answers
            .iter()
            .enumerate()
            .map(|(id, text)| BankWord {
                id,
                text: text.clone(),
            })
            .collect();

        Self {
            gap_text,
            bank,
            placements: BTreeMap::new(),
            answers: AnswerSet::default(),
            selected_word: None,
            show_results: false,
            case,
        }
    }

    pub fn gap_text(&self) -> &GapText {
        &self.gap_text
    }

    pub fn document(&self) -> &DisplayDocument {
        &self.gap_text.document
    }

    pub fn gap_count(&self) -> usize {
        self.gap_text.gap_count()
    }

    pub fn case(&self) -> CaseSensitivity {
        self.case
    }

    pub fn word_bank(&self) -> &[BankWord] {
        &self.bank
    }

    pub fn shuffle_bank<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.bank.shuffle(rng);
    }

    pub fn selected_word(&self) -> Option<usize> {
        self.selected_word
    }

    /// Marks a bank word as the one to place next. Returns `false` when the
    /// word is not in the bank.
    pub fn select_word(&mut self, id: usize) -> bool {
        if self.bank.iter().any(|w| w.id == id) {
            self.selected_word = Some(id);
            true
        } else {
            false
        }
    }

    /// Moves the selected bank word into `gap`. A word already sitting in
    /// that gap goes back to the bank.
    pub fn place_word(&mut self, gap: usize) -> bool {
        if gap >= self.gap_count() {
            return false;
        }
        let Some(id) = self.selected_word.take() else {
            return false;
        };
        let Some(pos) = self.bank.iter().position(|w| w.id == id) else {
            return false;
        };

        let word = self.bank.remove(pos);
        self.answers.set(gap, word.text.clone());
        if let Some(previous) = self.placements.insert(gap, word) {
            self.bank.push(previous);
        }
        true
    }

    /// Takes the word out of `gap` and returns it to the bank.
    pub fn unplace_word(&mut self, gap: usize) -> Option<BankWord> {
        let word = self.placements.remove(&gap)?;
        self.answers.clear(gap);
        self.bank.push(word.clone());
        Some(word)
    }

    pub fn placed_word(&self, gap: usize) -> Option<&BankWord> {
        self.placements.get(&gap)
    }

    /// Options offered for every gap when answering from a list: each
    /// hidden word once, alphabetically.
    pub fn choices(&self) -> Vec<String> {
        let mut choices = self.gap_text.answers.clone();
        choices.sort_by_key(|c| (c.to_lowercase(), c.clone()));
        choices.dedup();
        choices
    }

    /// Answers `gap` with one of [`choices`](Self::choices). Anything not
    /// on the list is refused.
    pub fn choose(&mut self, gap: usize, choice: &str) -> bool {
        if !self.gap_text.answers.iter().any(|a| a == choice) {
            return false;
        }
        self.type_answer(gap, choice)
    }

    /// Records free text for `gap`, replacing a placed word if there is one.
    pub fn type_answer(&mut self, gap: usize, text: impl Into<String>) -> bool {
        if gap >= self.gap_count() {
            return false;
        }
        self.unplace_word(gap);
        self.answers.set(gap, text);
        true
    }

    pub fn clear_answer(&mut self, gap: usize) {
        if self.unplace_word(gap).is_none() {
            self.answers.clear(gap);
        }
    }

    /// Takes answers from a filled-in copy of the rendered passage. Returns
    /// how many gaps received an answer.
    pub fn paste(&mut self, filled: &str) -> usize {
        let extracted = self.gap_text.document.extract_answers(filled);
        let mut received = 0;
        for (gap, answer) in extracted.iter() {
            if self.type_answer(gap, answer) {
                received += 1;
            }
        }
        received
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn answer(&self, gap: usize) -> Option<&str> {
        self.answers.get(gap)
    }

    pub fn all_placed(&self) -> bool {
        self.answers.answered_count() == self.gap_count()
    }

    pub fn request_grade(&mut self) -> ScoreResult {
        self.show_results = true;
        self.score()
    }

    pub fn show_results(&self) -> bool {
        self.show_results
    }

    pub fn score(&self) -> ScoreResult {
        grade(&self.gap_text.answers, &self.answers, self.case)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::grade::GapOutcome;

    const SAMPLE: &str = "The book which I bought yesterday is very interesting.";

    fn session() -> QuizSession {
        let gap_text = GapText::build(SAMPLE, &["which", "bought", "interesting"]);
        QuizSession::new(gap_text, CaseSensitivity::Insensitive)
    }

    fn bank_texts(session: &QuizSession) -> Vec<&str> {
        session
            .word_bank()
            .iter()
            .map(|w| w.text.as_str())
            .collect()
    }

    #[test]
    fn starts_with_every_word_in_the_bank() {
        let session = session();
        assert_eq!(bank_texts(&session), vec!["which", "bought", "interesting"]);
        assert_eq!(session.answers().answered_count(), 0);
        assert!(!session.show_results());
    }

    #[test]
    fn place_and_unplace() {
        let mut session = session();
        assert!(!session.place_word(0), "nothing selected yet");

        assert!(session.select_word(1));
        assert!(session.place_word(0));
        assert_eq!(session.answer(0), Some("bought"));
        assert_eq!(session.selected_word(), None);
        assert_eq!(bank_texts(&session), vec!["which", "interesting"]);

        let returned = session.unplace_word(0).unwrap();
        assert_eq!(returned.text, "bought");
        assert_eq!(session.answer(0), None);
        assert_eq!(bank_texts(&session), vec!["which", "interesting", "bought"]);
    }

    #[test]
    fn placing_over_a_word_returns_it_to_the_bank() {
        let mut session = session();
        session.select_word(0);
        session.place_word(2);
        session.select_word(2);
        session.place_word(2);

        assert_eq!(session.answer(2), Some("interesting"));
        assert_eq!(bank_texts(&session), vec!["bought", "which"]);
    }

    #[test]
    fn cannot_select_placed_words_or_place_out_of_range() {
        let mut session = session();
        session.select_word(0);
        session.place_word(0);
        assert!(!session.select_word(0));

        session.select_word(1);
        assert!(!session.place_word(7));
        assert_eq!(session.selected_word(), Some(1));
    }

    #[test]
    fn full_placement_grades_perfectly() {
        let mut session = session();
        for gap in 0..3 {
            session.select_word(gap);
            session.place_word(gap);
        }
        assert!(session.word_bank().is_empty());
        assert!(session.all_placed());

        let score = session.request_grade();
        assert!(session.show_results());
        assert!(score.complete);
        assert!(score.is_perfect());
    }

    #[test]
    fn swapped_words_are_wrong() {
        let mut session = session();
        session.select_word(0);
        session.place_word(1);
        session.select_word(1);
        session.place_word(0);
        session.select_word(2);
        session.place_word(2);

        let score = session.score();
        assert_eq!(score.correct, 1);
        assert_eq!(score.gaps[0].outcome, GapOutcome::Incorrect);
    }

    #[test]
    fn choices_are_sorted_and_unique() {
        let gap_text = GapText::build("Which one? The cat that ate the Which", &["which", "the"]);
        let session = QuizSession::new(gap_text, CaseSensitivity::Insensitive);
        assert_eq!(session.choices(), vec!["The", "Which"]);

        let session = self::session();
        assert_eq!(session.choices(), vec!["bought", "interesting", "which"]);
    }

    #[test]
    fn typed_answers_replace_placements() {
        let mut session = session();
        session.select_word(0);
        session.place_word(0);
        assert!(session.type_answer(0, "that"));

        assert_eq!(session.answer(0), Some("that"));
        assert!(session.placed_word(0).is_none());
        assert_eq!(session.word_bank().len(), 3);
        assert!(!session.type_answer(3, "nope"));
    }

    #[test]
    fn choose_only_accepts_listed_words() {
        let mut session = session();
        assert!(session.choose(1, "bought"));
        assert!(!session.choose(2, "elephant"));
        assert_eq!(session.answer(1), Some("bought"));
        assert_eq!(session.answer(2), None);
    }

    #[test]
    fn clear_answer_handles_both_kinds() {
        let mut session = session();
        session.type_answer(1, "bought");
        session.clear_answer(1);
        assert_eq!(session.answer(1), None);

        session.select_word(2);
        session.place_word(2);
        session.clear_answer(2);
        assert_eq!(session.answer(2), None);
        assert_eq!(session.word_bank().len(), 3);
    }

    #[test]
    fn pasted_text_fills_answers() {
        let mut session = session();
        let received =
            session.paste("The book which I [___1___] yesterday is very Interesting.");
        assert_eq!(received, 2);

        let score = session.score();
        assert_eq!(score.correct, 2);
        assert!(!score.complete);
    }

    #[test]
    fn score_tracks_changes() {
        let mut session = session();
        session.type_answer(0, "which");
        assert_eq!(session.score().correct, 1);
        session.type_answer(0, "that");
        assert_eq!(session.score().correct, 0);
    }

    #[test]
    fn shuffle_keeps_the_same_words() {
        let mut session = session();
        session.shuffle_bank(&mut StdRng::seed_from_u64(9));
        let mut texts = bank_texts(&session);
        texts.sort();
        assert_eq!(texts, vec!["bought", "interesting", "which"]);
    }
}
