use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::{Password, theme::ColorfulTheme};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::palette::Palette;
use crate::utils::{get_data_dir, strip_controls_and_escapes, trim_line};

pub const API_KEY_ENV: &str = "GAPFILL_OPENAI_API_KEY";

const AUTH_FILE_NAME: &str = "auth.json";
const OPENAI_PROVIDER: &str = "openai";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    AuthFile,
}

impl ApiKeySource {
    pub fn description(&self) -> &'static str {
        match self {
            ApiKeySource::Environment => "environment variable",
            ApiKeySource::AuthFile => "local auth file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub value: String,
    pub source: ApiKeySource,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AuthFile {
    #[serde(flatten)]
    providers: BTreeMap<String, ProviderAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProviderAuth {
    key: String,
}

/// API keys kept in a small JSON file, one entry per provider.
#[derive(Debug, Clone)]
pub struct AuthStore {
    path: PathBuf,
}

impl AuthStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `auth.json` in the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        Ok(Self::new(get_data_dir()?.join(AUTH_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn openai_key(&self) -> Result<Option<String>> {
        let Some(auth) = self.read()? else {
            return Ok(None);
        };
        Ok(auth
            .providers
            .get(OPENAI_PROVIDER)
            .and_then(|entry| trim_line(&entry.key))
            .map(str::to_string))
    }

    pub fn store_openai_key(&self, api_key: &str) -> Result<()> {
        let trimmed = trim_line(api_key).with_context(|| "Cannot store an empty API key")?;
        let mut auth = self.read()?.unwrap_or_default();
        auth.providers.insert(
            OPENAI_PROVIDER.to_string(),
            ProviderAuth {
                key: trimmed.to_string(),
            },
        );
        self.write(&auth)
    }

    /// Removes the stored key. The file itself goes away once no provider
    /// is left in it.
    pub fn clear_openai_key(&self) -> Result<bool> {
        let Some(mut auth) = self.read()? else {
            return Ok(false);
        };
        if auth.providers.remove(OPENAI_PROVIDER).is_none() {
            return Ok(false);
        }

        if auth.providers.is_empty() {
            fs::remove_file(&self.path).with_context(|| {
                format!(
                    "Failed to remove empty auth file at {}",
                    self.path.display()
                )
            })?;
        } else {
            self.write(&auth)?;
        }
        Ok(true)
    }

    fn read(&self) -> Result<Option<AuthFile>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => parse_auth_contents(&contents, &self.path).map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to read auth file at {}", self.path.display())),
        }
    }

    fn write(&self, auth: &AuthFile) -> Result<()> {
        fs::write(&self.path, serialize_auth(auth)?)
            .with_context(|| format!("Failed to write auth file at {}", self.path.display()))
    }
}

/// The environment value wins over the auth file when it is not blank.
pub fn lookup_api_key(env_value: Option<String>, store: &AuthStore) -> Result<Option<ApiKey>> {
    if let Some(value) = env_value
        && let Some(key) = trim_line(&value)
    {
        debug!(env = API_KEY_ENV, "using API key from environment");
        return Ok(Some(ApiKey {
            value: key.to_string(),
            source: ApiKeySource::Environment,
        }));
    }

    Ok(store.openai_key()?.map(|value| ApiKey {
        value,
        source: ApiKeySource::AuthFile,
    }))
}

pub fn find_api_key() -> Result<Option<ApiKey>> {
    lookup_api_key(env::var(API_KEY_ENV).ok(), &AuthStore::in_data_dir()?)
}

pub fn store_api_key(api_key: &str) -> Result<()> {
    AuthStore::in_data_dir()?.store_openai_key(api_key)
}

pub fn clear_api_key() -> Result<bool> {
    AuthStore::in_data_dir()?.clear_openai_key()
}

pub fn prompt_for_api_key(prompt: &str) -> Result<String> {
    println!("\n{}", prompt);
    println!(
        "{} (https://platform.openai.com/account/api-keys) to let a model pick the hidden words. It's stored locally for future use.",
        Palette::paint(Palette::SUCCESS, "Enter your OpenAI API key")
    );
    println!(
        "{}",
        Palette::dim("Leave the field blank to skip and use `--strategy linguistic` instead.")
    );
    let raw_password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("API Key")
        .allow_empty_password(true)
        .interact()?;

    Ok(strip_controls_and_escapes(&raw_password))
}

fn parse_auth_contents(contents: &str, path: &Path) -> Result<AuthFile> {
    if contents.trim().is_empty() {
        return Ok(AuthFile::default());
    }
    serde_json::from_str(contents)
        .with_context(|| format!("Failed to parse auth file at {}", path.display()))
}

fn serialize_auth(value: &AuthFile) -> Result<String> {
    let contents = serde_json::to_string_pretty(value)?;
    Ok(format!("{}\n", contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> AuthStore {
        AuthStore::new(dir.path().join(AUTH_FILE_NAME))
    }

    #[test]
    fn empty_file_has_no_providers() {
        let auth = parse_auth_contents("   \n", Path::new("auth.json")).unwrap();
        assert!(auth.providers.is_empty());
    }

    #[test]
    fn malformed_file_names_its_path() {
        let err = parse_auth_contents("{ not json", Path::new("/tmp/auth.json")).unwrap_err();
        assert!(err.to_string().contains("/tmp/auth.json"));
    }

    #[test]
    fn serialized_file_ends_with_newline() {
        let mut auth = AuthFile::default();
        auth.providers.insert(
            OPENAI_PROVIDER.to_string(),
            ProviderAuth {
                key: "test-key".to_string(),
            },
        );
        let serialized = serialize_auth(&auth).unwrap();
        assert!(serialized.ends_with('\n'));
        assert!(serialized.contains("\"openai\""));
    }

    #[test]
    fn missing_file_has_no_key() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.openai_key().unwrap(), None);
        assert!(!store.clear_openai_key().unwrap());
    }

    #[test]
    fn storing_twice_keeps_the_latest_key() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_openai_key("fake_key").unwrap();
        store.store_openai_key("  real_key \n").unwrap();
        assert_eq!(store.openai_key().unwrap().as_deref(), Some("real_key"));

        assert!(store.clear_openai_key().unwrap());
        assert!(!store.path().exists());
        assert_eq!(store.openai_key().unwrap(), None);
    }

    #[test]
    fn clearing_keeps_other_providers() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"openai": {"key": "k1"}, "other": {"key": "k2"}}"#,
        )
        .unwrap();

        assert!(store.clear_openai_key().unwrap());
        let left = fs::read_to_string(store.path()).unwrap();
        assert!(left.contains("other"));
        assert!(!left.contains("openai"));
    }

    #[test]
    fn blank_keys_are_refused() {
        let dir = tempdir().unwrap();
        assert!(store_in(&dir).store_openai_key("  ").is_err());
    }

    #[test]
    fn environment_beats_auth_file() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.store_openai_key("from-file").unwrap();

        let key = lookup_api_key(Some("from-env".to_string()), &store)
            .unwrap()
            .unwrap();
        assert_eq!(key.value, "from-env");
        assert_eq!(key.source, ApiKeySource::Environment);

        let key = lookup_api_key(Some("   ".to_string()), &store)
            .unwrap()
            .unwrap();
        assert_eq!(key.value, "from-file");
        assert_eq!(key.source, ApiKeySource::AuthFile);
    }

    #[test]
    fn nothing_configured() {
        let dir = tempdir().unwrap();
        assert_eq!(lookup_api_key(None, &store_in(&dir)).unwrap(), None);
    }
}
