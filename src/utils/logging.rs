//! Structured logging and log-hygiene utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing utilities to keep API
//! keys and multi-megabyte image payloads out of log sinks.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{EditorError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    // Configure filter from environment or config file
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    result.map_err(|e| EditorError::Internal(format!("Failed to initialize logging: {}", e)))
}

/// Google API keys: `AIza` followed by 35 URL-safe characters.
static API_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"AIza[0-9A-Za-z_\-]{10,}").expect("valid API key regex"));

/// Long base64 runs, as found in inline image data.
static BASE64_BLOB_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9+/]{200,}={0,2}").expect("valid base64 regex"));

/// Sanitizes sensitive or bulky information from log messages.
///
/// Replaces Google API keys with `[REDACTED_API_KEY]` and long base64 image
/// data with a `[BASE64 n chars]` marker.
pub fn sanitize(input: &str) -> String {
    let redacted = API_KEY_PATTERN.replace_all(input, "[REDACTED_API_KEY]");
    BASE64_BLOB_PATTERN
        .replace_all(&redacted, |caps: &regex::Captures| {
            format!("[BASE64 {} chars]", caps[0].len())
        })
        .into_owned()
}
