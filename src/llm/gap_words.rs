use anyhow::Result;
use async_openai::{Client, config::OpenAIConfig};
use tracing::{debug, instrument};

use super::response::request_single_text_response;
use crate::select::{PREVIEW_CHARS, WordSource};
use crate::utils::truncate_preview;

pub const DEFAULT_MODEL: &str = "gpt-5-nano";

const SYSTEM_PROMPT: &str = r#"
You help teachers build gap-fill grammar exercises for English learners.
You answer with a list of words and nothing else.
"#;

const USER_PROMPT_HEADER: &str = r#"
Pick words to hide from the passage below so a learner has to restore them.
Prefer grammatically significant words: relative pronouns, prepositions,
conjunctions, verb forms and adverbs. Every word must appear in the passage
exactly as written. Answer only with a list of strings, for example:

["which", "bought", "interesting"]

"#;

fn user_prompt(passage: &str, count: usize) -> String {
    format!("{USER_PROMPT_HEADER}Number of words: {count}\n\nPassage:\n{passage}")
}

/// Asks an OpenAI model for words to hide. One request per call, no retry.
pub struct OpenAiWordSource {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiWordSource {
    pub fn new(client: Client<OpenAIConfig>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl WordSource for OpenAiWordSource {
    #[instrument(skip(self, passage), fields(model = %self.model, passage_chars = passage.chars().count()))]
    async fn suggest(&self, passage: &str, count: usize) -> Result<String> {
        let prompt = user_prompt(passage, count);
        let raw = request_single_text_response(&self.client, &self.model, SYSTEM_PROMPT, &prompt)
            .await?;
        debug!(response = %truncate_preview(&raw, PREVIEW_CHARS), "model suggested words");
        Ok(raw)
    }
}
