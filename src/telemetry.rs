//! Log setup for the binary.
//!
//! - `GAPFILL_LOG` holds the filter directives (default `warn`), e.g.
//!   `gapfill=debug`.
//! - `GAPFILL_LOG_FORMAT=json` switches to JSON lines.
//!
//! Logs go to stderr so they never mix with quiz output or `--json` on stdout.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GAPFILL_LOG";
pub const LOG_FORMAT_ENV: &str = "GAPFILL_LOG_FORMAT";

const DEFAULT_DIRECTIVES: &str = "warn";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    // A subscriber may already be installed; the first one stays.
    let _ = match std::env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => builder.json().try_init(),
        _ => builder.try_init(),
    };
}
