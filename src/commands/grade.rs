use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::generate::Quiz;
use crate::gap_text::placeholder;
use crate::grade::{CaseSensitivity, GapOutcome, ScoreResult, grade};
use crate::palette::Palette;
use crate::utils::{pluralize, strip_controls_and_escapes};

pub fn load_quiz(path: &Path) -> Result<Quiz> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read quiz from {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| {
        format!(
            "{} is not a saved quiz. Create one with `gapfill generate --json`.",
            path.display()
        )
    })
}

/// Grades a filled-in copy of the quiz's rendered passage.
pub fn grade_filled_text(quiz: &Quiz, filled: &str, case: CaseSensitivity) -> ScoreResult {
    let answers = quiz.gap_text.document.extract_answers(filled);
    grade(&quiz.gap_text.answers, &answers, case)
}

pub fn run(quiz_path: &Path, answers_path: &Path, case: CaseSensitivity, json: bool) -> Result<()> {
    let quiz = load_quiz(quiz_path)?;
    let filled = fs::read_to_string(answers_path)
        .with_context(|| format!("Failed to read answers from {}", answers_path.display()))?;
    let score = grade_filled_text(&quiz, &strip_controls_and_escapes(&filled), case);

    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else {
        for line in report_lines(&score) {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn summary(score: &ScoreResult) -> String {
    let mut summary = format!("Score: {}/{}", score.correct, score.total);
    let unanswered = score.total - score.gaps.iter().filter(|g| g.submitted.is_some()).count();
    if !score.complete {
        summary.push_str(&format!(" ({} unanswered)", pluralize("gap", unanswered)));
    }
    summary
}

pub fn report_lines(score: &ScoreResult) -> Vec<String> {
    let mut lines = Vec::with_capacity(score.gaps.len() + 1);
    let color = if score.is_perfect() {
        Palette::SUCCESS
    } else {
        Palette::WARNING
    };
    lines.push(Palette::paint(color, summary(score)));

    for gap in &score.gaps {
        let marker = placeholder(gap.index);
        let line = match gap.outcome {
            GapOutcome::Correct => format!(
                "  {} {}",
                marker,
                Palette::paint(Palette::SUCCESS, &gap.expected)
            ),
            GapOutcome::Incorrect => format!(
                "  {} {} {}",
                marker,
                Palette::paint(Palette::DANGER, gap.submitted.as_deref().unwrap_or_default()),
                Palette::dim(format!("(expected {})", gap.expected))
            ),
            GapOutcome::Unanswered => format!(
                "  {} {}",
                marker,
                Palette::dim(format!("unanswered (expected {})", gap.expected))
            ),
        };
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::gap_text::GapText;

    const PASSAGE: &str = "The book which I bought yesterday is very interesting.";

    fn quiz() -> Quiz {
        Quiz::new(
            PASSAGE.to_string(),
            GapText::build(PASSAGE, &["which", "bought", "interesting"]),
        )
    }

    #[test]
    fn grades_a_pasted_copy() {
        let filled = "The book which I buy yesterday is very [___2___].";
        let score = grade_filled_text(&quiz(), filled, CaseSensitivity::Insensitive);

        assert_eq!(score.correct, 1);
        assert_eq!(score.gaps[1].outcome, GapOutcome::Incorrect);
        assert_eq!(score.gaps[2].outcome, GapOutcome::Unanswered);
        assert!(!score.complete);
        assert_eq!(summary(&score), "Score: 1/3 (1 gap unanswered)");
    }

    #[test]
    fn perfect_copy() {
        let score = grade_filled_text(&quiz(), PASSAGE, CaseSensitivity::Sensitive);
        assert!(score.is_perfect());
        assert_eq!(summary(&score), "Score: 3/3");
    }

    #[test]
    fn report_mentions_expected_words() {
        let filled = "The book that I bought yesterday is very [___2___].";
        let score = grade_filled_text(&quiz(), filled, CaseSensitivity::Insensitive);
        let report = report_lines(&score).join("\n");

        assert!(report.contains("Score: 1/3"));
        assert!(report.contains("(expected which)"));
        assert!(report.contains("unanswered (expected interesting)"));
    }

    #[test]
    fn loads_saved_quiz() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&quiz()).unwrap()).unwrap();
        assert_eq!(load_quiz(file.path()).unwrap(), quiz());
    }

    #[test]
    fn rejects_files_that_are_not_quizzes() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "just some text").unwrap();
        let err = load_quiz(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("is not a saved quiz"));
    }
}
