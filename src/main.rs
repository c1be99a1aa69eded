use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueHint};

use gapfill::commands::generate::{self, QuizOptions, SAMPLE_PASSAGE, Strategy};
use gapfill::commands::grade;
use gapfill::commands::quiz::{self, InputMode};
use gapfill::grade::CaseSensitivity;
use gapfill::{llm, telemetry};

#[derive(Parser, Debug)]
#[command(
    name = "gapfill",
    version,
    about = "Gap-fill grammar quizzes in your terminal.",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct PassageArgs {
    /// Passage to quiz on
    #[arg(long, default_value = SAMPLE_PASSAGE, conflicts_with = "file")]
    text: String,
    /// Read the passage from a file instead
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    file: Option<PathBuf>,
    /// Number of words to hide
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=25))]
    count: u16,
    /// How the hidden words are chosen
    #[arg(long, value_enum, default_value_t = Strategy::Linguistic)]
    strategy: Strategy,
    /// Seed for reproducible word selection and bank order
    #[arg(long)]
    seed: Option<u64>,
    /// OpenAI model used by `--strategy llm`
    #[arg(long, default_value = llm::DEFAULT_MODEL)]
    model: String,
}

impl From<PassageArgs> for QuizOptions {
    fn from(args: PassageArgs) -> Self {
        QuizOptions {
            text: args.text,
            file: args.file,
            count: usize::from(args.count),
            strategy: args.strategy,
            seed: args.seed,
            model: args.model,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a quiz and solve it interactively
    Quiz {
        #[command(flatten)]
        passage: PassageArgs,
        /// How answers are entered
        #[arg(long, value_enum, default_value_t = InputMode::Place)]
        mode: InputMode,
        /// Require the exact capitalization of every hidden word
        #[arg(long, default_value_t = false)]
        case_sensitive: bool,
    },
    /// Print a quiz and its answer key
    Generate {
        #[command(flatten)]
        passage: PassageArgs,
        /// Emit the quiz as JSON, suitable for `gapfill grade --quiz`
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Grade a filled-in copy of a saved quiz
    Grade {
        /// Quiz saved with `gapfill generate --json`
        #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
        quiz: PathBuf,
        /// The rendered passage with the placeholders replaced by answers
        #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
        answers: PathBuf,
        /// Require the exact capitalization of every hidden word
        #[arg(long, default_value_t = false)]
        case_sensitive: bool,
        /// Emit the score as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Manage the OpenAI API key used by `--strategy llm`
    Llm {
        /// Store a new API key in the local auth file
        #[arg(long, value_name = "KEY", conflicts_with = "clear")]
        set: Option<String>,
        /// Remove the stored API key from the local auth file
        #[arg(long, conflicts_with = "test")]
        clear: bool,
        /// Verify the configured API key by calling the OpenAI API
        #[arg(long, conflicts_with = "clear")]
        test: bool,
    },
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    if let Err(err) = run_cli().await {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Quiz {
            passage,
            mode,
            case_sensitive,
        } => {
            let options = QuizOptions::from(passage);
            quiz::run(&options, mode, CaseSensitivity::from_flag(case_sensitive)).await?;
        }
        Command::Generate { passage, json } => {
            generate::run(&QuizOptions::from(passage), json).await?;
        }
        Command::Grade {
            quiz,
            answers,
            case_sensitive,
            json,
        } => {
            grade::run(
                &quiz,
                &answers,
                CaseSensitivity::from_flag(case_sensitive),
                json,
            )?;
        }
        Command::Llm { set, clear, test } => handle_llm_command(set, clear, test).await?,
    }

    Ok(())
}

async fn handle_llm_command(set: Option<String>, clear: bool, test: bool) -> Result<()> {
    let mut action_taken = false;

    if let Some(key) = set {
        llm::store_api_key(&key)?;
        println!("Stored OpenAI API key in the local auth file.");
        action_taken = true;
    }

    if clear {
        let removed = llm::clear_api_key()?;
        if removed {
            println!("Removed the stored OpenAI API key.");
        } else {
            println!("No OpenAI API key found in the auth file.");
        }
        action_taken = true;
    }

    if test {
        let source = llm::test_configured_api_key().await?;
        println!("OpenAI API key from the {} is valid.", source.description());
        action_taken = true;
    }

    if !action_taken {
        bail!("No action provided. Use --set, --clear, or --test.");
    }
    Ok(())
}
