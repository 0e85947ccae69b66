//! Client configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default Gemini REST endpoint.
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model to use.
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";

/// Default Unsplash API endpoint.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://api.unsplash.com";

/// Default timeout for outgoing calls, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Which model backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Fake,
}

/// Generative model configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// API key. Required for Gemini, ignored by the fake provider.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// - `SAUCIER_LLM_PROVIDER`: "gemini" (default) or "fake"
    /// - `GEMINI_API_KEY`: required when the provider is gemini
    /// - `SAUCIER_LLM_MODEL`: model name (default: "gemini-2.0-flash")
    /// - `SAUCIER_LLM_BASE_URL`: API base URL
    /// - `SAUCIER_HTTP_TIMEOUT_SECS`: request timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("SAUCIER_LLM_PROVIDER")
            .unwrap_or_else(|_| "gemini".to_string())
            .as_str()
        {
            "gemini" => ProviderKind::Gemini,
            "fake" => ProviderKind::Fake,
            other => {
                return Err(ConfigError::InvalidValue {
                    name: "SAUCIER_LLM_PROVIDER".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty());
        if provider == ProviderKind::Gemini && api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()));
        }

        Ok(Self {
            provider,
            api_key,
            model: env::var("SAUCIER_LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            base_url: env::var("SAUCIER_LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            timeout: timeout_from_env()?,
        })
    }
}

/// Image search configuration. Search is disabled when no key is set.
#[derive(Debug, Clone)]
pub struct ImageSearchConfig {
    pub access_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl ImageSearchConfig {
    /// - `UNSPLASH_ACCESS_KEY`: optional; without it no images are looked up
    /// - `SAUCIER_IMAGE_BASE_URL`: API base URL
    /// - `SAUCIER_HTTP_TIMEOUT_SECS`: request timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_key: env::var("UNSPLASH_ACCESS_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: env::var("SAUCIER_IMAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string()),
            timeout: timeout_from_env()?,
        })
    }
}

fn timeout_from_env() -> Result<Duration, ConfigError> {
    match env::var("SAUCIER_HTTP_TIMEOUT_SECS") {
        Ok(raw) => parse_timeout_secs(&raw).ok_or(ConfigError::InvalidValue {
            name: "SAUCIER_HTTP_TIMEOUT_SECS".to_string(),
            value: raw,
        }),
        Err(_) => Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
    }
}

fn parse_timeout_secs(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
