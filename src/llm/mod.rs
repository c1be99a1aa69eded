pub mod client;
pub mod gap_words;
pub mod response;
pub mod secrets;

pub use client::{ensure_client, test_configured_api_key};
pub use gap_words::{DEFAULT_MODEL, OpenAiWordSource};
pub use secrets::{clear_api_key, store_api_key};
