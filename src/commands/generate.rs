use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::gap_text::{GapText, placeholder};
use crate::llm::{self, OpenAiWordSource};
use crate::palette::Palette;
use crate::passage::HeuristicTagger;
use crate::select::{self, Selection, SelectionNotice};
use crate::utils::{load_passage, pluralize};

pub const SAMPLE_PASSAGE: &str = "The book which I bought yesterday is very interesting.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Part-of-speech rules pick the words.
    #[default]
    Linguistic,
    /// An OpenAI model picks the words.
    Llm,
}

#[derive(Clone, Debug)]
pub struct QuizOptions {
    pub text: String,
    pub file: Option<PathBuf>,
    pub count: usize,
    pub strategy: Strategy,
    pub seed: Option<u64>,
    pub model: String,
}

impl QuizOptions {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// A generated quiz as shown to the user and as saved by `generate --json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub passage: String,
    pub rendered: String,
    #[serde(flatten)]
    pub gap_text: GapText,
}

impl Quiz {
    pub fn new(passage: String, gap_text: GapText) -> Self {
        Self {
            rendered: gap_text.document.render(),
            passage,
            gap_text,
        }
    }

    pub fn answer_key(&self) -> Vec<String> {
        self.gap_text
            .answers
            .iter()
            .enumerate()
            .map(|(i, answer)| format!("{} {}", placeholder(i), answer))
            .collect()
    }
}

/// Selects gaps with the configured strategy and builds the quiz. Returns
/// `None` after telling the user why when there is nothing to quiz on.
pub async fn generate_quiz(options: &QuizOptions, confirm_llm: bool) -> Result<Option<Quiz>> {
    let passage = load_passage(&options.text, options.file.as_deref())?;

    let (selection, gap_text) = match options.strategy {
        Strategy::Linguistic => {
            let mut rng = options.rng();
            let selection =
                select::linguistic::select(&passage, options.count, &HeuristicTagger, &mut rng)?;
            let gap_text = GapText::from_gap_set(&passage, &selection.gaps);
            (selection, gap_text)
        }
        Strategy::Llm => {
            let client = llm::ensure_client(
                "The passage will be sent to OpenAI to choose the hidden words.",
                confirm_llm,
            )?;
            let source = OpenAiWordSource::new(client, options.model.clone());
            let selection = select::external::select(&passage, options.count, &source)
                .await
                .context("Could not generate a quiz")?;
            let gap_text = GapText::build(&passage, &selection.gaps.surfaces());
            (selection, gap_text)
        }
    };

    Ok(quiz_from_selection(passage, &selection, gap_text))
}

fn quiz_from_selection(passage: String, selection: &Selection, gap_text: GapText) -> Option<Quiz> {
    if let Some(notice) = &selection.notice {
        eprintln!("{}", notice_message(notice));
    }
    if passage.trim().is_empty() {
        eprintln!(
            "{}",
            Palette::paint(Palette::WARNING, "The passage is empty. Pass --text or --file.")
        );
        return None;
    }
    if gap_text.gap_count() == 0 {
        return None;
    }

    info!(
        gaps = gap_text.gap_count(),
        notice = ?selection.notice,
        "quiz generated"
    );
    Some(Quiz::new(passage, gap_text))
}

pub fn notice_message(notice: &SelectionNotice) -> String {
    let color = match notice {
        SelectionNotice::Clamped { .. } => Palette::WARNING,
        SelectionNotice::NoGapsPossible => Palette::DANGER,
    };
    Palette::paint(color, notice)
}

pub async fn run(options: &QuizOptions, json: bool) -> Result<()> {
    let Some(quiz) = generate_quiz(options, !json).await? else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&quiz)?);
        return Ok(());
    }

    println!("{}\n", quiz.rendered);
    println!(
        "{}",
        Palette::paint(
            Palette::INFO,
            format!("Answer key ({})", pluralize("gap", quiz.gap_text.gap_count()))
        )
    );
    for line in quiz.answer_key() {
        println!("  {}", line);
    }
    Ok(())
}
