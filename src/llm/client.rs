use anyhow::{Context, Result, anyhow, bail};
use async_openai::{Client, config::OpenAIConfig};
use tracing::debug;

use super::secrets::{API_KEY_ENV, ApiKeySource, find_api_key, prompt_for_api_key, store_api_key};
use crate::utils::ask_yn;

/// Builds a client from the configured key, prompting for one when none is
/// set. With `confirm`, a stored key is only used after a yes/no prompt.
pub fn ensure_client(user_prompt: &str, confirm: bool) -> Result<Client<OpenAIConfig>> {
    let (key, prompted_for_key) = match find_api_key()? {
        Some(api_key) => (api_key.value, false),
        None => {
            let api_key = prompt_for_api_key(user_prompt)?;
            if api_key.is_empty() {
                bail!(
                    "No API key provided. Set {} or run `gapfill llm --set <KEY>`.",
                    API_KEY_ENV
                );
            }
            store_api_key(&api_key)?;
            (api_key, true)
        }
    };

    if confirm && !prompted_for_key && !ask_yn(user_prompt.to_string())? {
        bail!("LLM client not initialized.");
    }

    Ok(initialize_client(&key))
}

pub async fn test_configured_api_key() -> Result<ApiKeySource> {
    let api_key = find_api_key()?.ok_or_else(|| {
        anyhow!(
            "No API key configured. To use `--strategy llm`, set {} or run `gapfill llm --set <KEY>`.",
            API_KEY_ENV
        )
    })?;
    let client = initialize_client(&api_key.value);
    healthcheck_client(&client).await?;
    Ok(api_key.source)
}

fn initialize_client(api_key: &str) -> Client<OpenAIConfig> {
    Client::with_config(OpenAIConfig::new().with_api_key(api_key))
}

async fn healthcheck_client(client: &Client<OpenAIConfig>) -> Result<()> {
    client
        .models()
        .list()
        .await
        .context("Failed to validate API key with OpenAI")?;
    debug!("API key accepted");
    Ok(())
}
