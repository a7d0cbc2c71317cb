//! Logging setup for the `lrtree` binary and tests.
//!
//! Filter precedence:
//!
//! 1. `--log-level` / `LRTREE_LOG`
//! 2. `RUST_LOG`
//! 3. `warn`
//!
//! Logs go to stderr so tree output on stdout stays machine-readable.

use std::env;

use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Fails if one is already installed or the
/// filter does not parse.
pub fn init(level: Option<&str>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = create_filter(level)?;
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

/// Test-friendly variant of [`init`]; safe to call from every test.
pub fn test() {
    let _ = fmt()
        .with_env_filter(create_filter(None).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with_test_writer()
        .try_init();
}

fn create_filter(level: Option<&str>) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    match level {
        Some(directives) => EnvFilter::try_new(directives),
        None => match env::var("RUST_LOG") {
            Ok(directives) => EnvFilter::try_new(directives),
            Err(_) => EnvFilter::try_new(DEFAULT_FILTER),
        },
    }
}
