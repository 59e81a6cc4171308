use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::letter::ContactDetails;

/// Which text-generation backend drafts the letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationBackend {
    /// Fixed template after an artificial delay.
    Mock,
    /// Anthropic Messages API via `LlmClient`.
    Anthropic,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub generation_backend: GenerationBackend,
    /// Only required when `generation_backend` is `Anthropic`.
    pub anthropic_api_key: Option<String>,
    pub mock_delay: Duration,
    pub generation_timeout: Duration,
    pub session_ttl: Duration,
    pub contact: ContactDetails,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let generation_backend = match lookup("GENERATION_BACKEND")
            .unwrap_or_else(|| "mock".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "mock" => GenerationBackend::Mock,
            "anthropic" => GenerationBackend::Anthropic,
            other => bail!("GENERATION_BACKEND must be 'mock' or 'anthropic', got '{other}'"),
        };

        let anthropic_api_key = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());
        if generation_backend == GenerationBackend::Anthropic && anthropic_api_key.is_none() {
            bail!("Required environment variable 'ANTHROPIC_API_KEY' is not set");
        }

        let defaults = ContactDetails::default();

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080u16)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            generation_backend,
            anthropic_api_key,
            mock_delay: Duration::from_millis(parse_or(&lookup, "MOCK_GENERATION_DELAY_MS", 1000u64)?),
            generation_timeout: Duration::from_secs(parse_or(&lookup, "GENERATION_TIMEOUT_SECS", 60u64)?),
            session_ttl: Duration::from_secs(parse_or(&lookup, "SESSION_TTL_SECS", 3600u64)?),
            contact: ContactDetails {
                name: lookup("CONTACT_NAME").unwrap_or(defaults.name),
                phone: lookup("CONTACT_PHONE").unwrap_or(defaults.phone),
                email: lookup("CONTACT_EMAIL").unwrap_or(defaults.email),
                url: lookup("CONTACT_URL").unwrap_or(defaults.url),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
