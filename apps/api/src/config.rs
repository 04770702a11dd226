use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Use the 0–100 project scorer instead of the standard analyzer.
    pub enable_advanced_project_scoring: bool,
    /// Optimizations each user gets before the upgrade prompt.
    pub free_optimizations: u32,
    /// Upper bound on any single external call.
    pub external_call_timeout: Duration,
    /// Idle time before a session is evicted.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            enable_advanced_project_scoring: parse_flag(&optional_env(
                "ENABLE_ADVANCED_PROJECT_SCORING",
                "false",
            ))
            .context("ENABLE_ADVANCED_PROJECT_SCORING must be true or false")?,
            free_optimizations: optional_env("FREE_OPTIMIZATIONS", "3")
                .parse::<u32>()
                .context("FREE_OPTIMIZATIONS must be a non-negative integer")?,
            external_call_timeout: Duration::from_secs(
                optional_env("EXTERNAL_CALL_TIMEOUT_SECS", "90")
                    .parse::<u64>()
                    .context("EXTERNAL_CALL_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            session_ttl: Duration::from_secs(parse_positive_secs(
                "SESSION_TTL_SECS",
                &optional_env("SESSION_TTL_SECS", "3600"),
            )?),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_positive_secs(key: &str, value: &str) -> Result<u64> {
    let secs = value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{key} must be a whole number of seconds"))?;
    anyhow::ensure!(secs > 0, "{key} must be greater than zero");
    Ok(secs)
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}
