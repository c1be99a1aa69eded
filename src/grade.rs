use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Answers a user has submitted so far, keyed by gap index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<usize, String>,
}

impl AnswerSet {
    pub fn set(&mut self, gap: usize, answer: impl Into<String>) {
        self.answers.insert(gap, answer.into());
    }

    pub fn clear(&mut self, gap: usize) -> Option<String> {
        self.answers.remove(&gap)
    }

    pub fn get(&self, gap: usize) -> Option<&str> {
        self.answers.get(&gap).map(String::as_str)
    }

    /// Gaps holding something other than whitespace.
    pub fn answered_count(&self) -> usize {
        self.answers
            .values()
            .filter(|a| !a.trim().is_empty())
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.answers.iter().map(|(gap, a)| (*gap, a.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().map(|(gap, a)| (gap, a.into())).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    Sensitive,
    #[default]
    Insensitive,
}

impl CaseSensitivity {
    pub fn from_flag(case_sensitive: bool) -> Self {
        if case_sensitive {
            CaseSensitivity::Sensitive
        } else {
            CaseSensitivity::Insensitive
        }
    }

    pub fn matches(self, submitted: &str, expected: &str) -> bool {
        match self {
            CaseSensitivity::Sensitive => submitted == expected,
            CaseSensitivity::Insensitive => submitted.to_lowercase() == expected.to_lowercase(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapOutcome {
    Correct,
    Incorrect,
    Unanswered,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GapResult {
    pub index: usize,
    pub expected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<String>,
    pub outcome: GapOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub correct: usize,
    pub total: usize,
    /// Every gap has a non-blank answer.
    pub complete: bool,
    pub gaps: Vec<GapResult>,
}

impl ScoreResult {
    pub fn is_perfect(&self) -> bool {
        self.correct == self.total
    }
}

/// Scores `answers` against the hidden words. Blank or missing answers count
/// as unanswered; nothing here can fail.
pub fn grade(correct: &[String], answers: &AnswerSet, case: CaseSensitivity) -> ScoreResult {
    let gaps: Vec<GapResult> = correct
        .iter()
        .enumerate()
        .map(|(index, expected)| {
            let submitted = answers
                .get(index)
                .map(str::trim)
                .filter(|a| !a.is_empty());
            let outcome = match submitted {
                None => GapOutcome::Unanswered,
                Some(answer) if case.matches(answer, expected) => GapOutcome::Correct,
                Some(_) => GapOutcome::Incorrect,
            };
            GapResult {
                index,
                expected: expected.clone(),
                submitted: submitted.map(str::to_string),
                outcome,
            }
        })
        .collect();

    ScoreResult {
        correct: gaps
            .iter()
            .filter(|g| g.outcome == GapOutcome::Correct)
            .count(),
        total: gaps.len(),
        complete: gaps.iter().all(|g| g.outcome != GapOutcome::Unanswered),
        gaps,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn key(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn case_policy() {
        let correct = key(&["Cat"]);
        let answers: AnswerSet = [(0, "cat")].into_iter().collect();

        let loose = grade(&correct, &answers, CaseSensitivity::Insensitive);
        assert_eq!((loose.correct, loose.total), (1, 1));

        let strict = grade(&correct, &answers, CaseSensitivity::Sensitive);
        assert_eq!((strict.correct, strict.total), (0, 1));
        assert_eq!(strict.gaps[0].outcome, GapOutcome::Incorrect);
    }

    #[test]
    fn one_unanswered_gap_makes_the_score_incomplete() {
        let correct = key(&["which", "bought", "interesting"]);
        let answers: AnswerSet = [(0, "which"), (2, "interesting")].into_iter().collect();

        let result = grade(&correct, &answers, CaseSensitivity::Insensitive);
        assert!(!result.complete);
        assert_eq!(result.correct, 2);
        assert_eq!(result.gaps[1].outcome, GapOutcome::Unanswered);
        assert_eq!(result.gaps[1].submitted, None);
        assert!(!result.is_perfect());
    }

    #[test]
    fn blank_answers_are_unanswered() {
        let correct = key(&["on", "which"]);
        let answers: AnswerSet = [(0, "   "), (1, "")].into_iter().collect();

        let result = grade(&correct, &answers, CaseSensitivity::Sensitive);
        assert!(!result.complete);
        assert_eq!(result.correct, 0);
        assert!(
            result
                .gaps
                .iter()
                .all(|g| g.outcome == GapOutcome::Unanswered)
        );
    }

    #[test]
    fn answers_are_trimmed_before_comparison() {
        let correct = key(&["which"]);
        let answers: AnswerSet = [(0, "  which\n")].into_iter().collect();

        let result = grade(&correct, &answers, CaseSensitivity::Sensitive);
        assert!(result.complete);
        assert!(result.is_perfect());
        assert_eq!(result.gaps[0].submitted.as_deref(), Some("which"));
    }

    #[test]
    fn extra_answers_are_ignored() {
        let correct = key(&["on"]);
        let answers: AnswerSet = [(0, "on"), (5, "stray")].into_iter().collect();

        let result = grade(&correct, &answers, CaseSensitivity::Insensitive);
        assert_eq!(result.total, 1);
        assert!(result.complete);
        assert_eq!(result.correct, 1);
    }

    #[test]
    fn empty_key_is_trivially_complete() {
        let result = grade(&[], &AnswerSet::default(), CaseSensitivity::Insensitive);
        assert_eq!(result.total, 0);
        assert!(result.complete);
        assert!(result.is_perfect());
    }

    #[test]
    fn answer_set_bookkeeping() {
        let mut answers = AnswerSet::default();
        answers.set(1, "which");
        answers.set(0, " ");
        assert_eq!(answers.answered_count(), 1);
        assert_eq!(answers.clear(1).as_deref(), Some("which"));
        assert_eq!(answers.get(1), None);
        assert_eq!(answers.iter().collect::<Vec<_>>(), vec![(0, " ")]);
    }

    #[test]
    fn score_serializes_for_reports() {
        let correct = key(&["Cat"]);
        let answers: AnswerSet = [(0, "dog")].into_iter().collect();
        let json =
            serde_json::to_value(grade(&correct, &answers, CaseSensitivity::Insensitive)).unwrap();
        assert_eq!(json["correct"], 0);
        assert_eq!(json["gaps"][0]["outcome"], "incorrect");
        assert_eq!(json["gaps"][0]["submitted"], "dog");
    }

    proptest! {
        #[test]
        fn grading_is_pure(
            correct in prop::collection::vec("[a-zA-Z]{1,6}", 0..6),
            submitted in prop::collection::btree_map(0usize..8, "[a-zA-Z ]{0,6}", 0..8),
        ) {
            let answers: AnswerSet = submitted.into_iter().collect();
            let first = grade(&correct, &answers, CaseSensitivity::Insensitive);
            let second = grade(&correct, &answers, CaseSensitivity::Insensitive);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.correct <= first.total);
            prop_assert_eq!(first.total, correct.len());
            prop_assert_eq!(
                first.complete,
                (0..correct.len()).all(|i| answers.get(i).is_some_and(|a| !a.trim().is_empty()))
            );
        }
    }
}
