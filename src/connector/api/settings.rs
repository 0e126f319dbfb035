use std::str::FromStr;
use std::time::Duration;

use rand::RngCore;
use tracing::warn;

use crate::application::DEFAULT_TIMEOUT;
use crate::connector::adapter::{anthropic, openai};
use crate::domain::SamplingConfig;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => openai::DEFAULT_MODEL,
            LlmProvider::Anthropic => anthropic::DEFAULT_MODEL,
        }
    }

    fn model_var(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "OPENAI_MODEL",
            LlmProvider::Anthropic => "ANTHROPIC_MODEL",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" => Ok(LlmProvider::Anthropic),
            other => Err(format!("unknown LLM provider '{other}'")),
        }
    }
}

/// Tunables of the search pipeline.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub provider: LlmProvider,
    pub sampling: SamplingConfig,
    pub timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        let provider = LlmProvider::OpenAi;
        Self {
            provider,
            sampling: SamplingConfig::new(provider.default_model()),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SearchSettings {
    /// | Variable              | Default                         |
    /// |-----------------------|---------------------------------|
    /// | `LLM_PROVIDER`        | `openai`                        |
    /// | `OPENAI_MODEL`        | `gpt-4o-mini`                   |
    /// | `ANTHROPIC_MODEL`     | `claude-haiku-4-5`              |
    /// | `SEARCH_TEMPERATURE`  | `0.0`                           |
    /// | `SEARCH_MAX_TOKENS`   | `300`                           |
    /// | `SEARCH_TIMEOUT_SECS` | `8`                             |
    pub fn from_env() -> Self {
        let provider = env_or("LLM_PROVIDER", LlmProvider::OpenAi);
        let model = std::env::var(provider.model_var())
            .unwrap_or_else(|_| provider.default_model().to_string());
        let defaults = SamplingConfig::new(model);

        let sampling = defaults
            .clone()
            .with_temperature(env_or("SEARCH_TEMPERATURE", defaults.temperature))
            .with_max_tokens(env_or("SEARCH_MAX_TOKENS", defaults.max_tokens));
        let timeout = Duration::from_secs(env_or("SEARCH_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs()));

        Self {
            provider,
            sampling,
            timeout,
        }
    }
}

/// Settings of the HTTP surface.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub session_secret: String,
    pub allowed_origins: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            session_secret: random_secret(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

impl HttpSettings {
    pub fn from_env() -> Self {
        let session_secret = match std::env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("SESSION_SECRET is not set; sessions will not survive a restart");
                random_secret()
            }
        };

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();
        let allowed_origins = if allowed_origins.is_empty() {
            vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
        } else {
            allowed_origins
        };

        Self {
            session_secret,
            allowed_origins,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| o.trim_end_matches('/').to_string())
        .collect()
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring {}={:?}: {}", key, raw, e);
                default
            }
        },
        Err(_) => default,
    }
}
