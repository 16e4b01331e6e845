//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_LLM_MODEL: &str = "google/gemini-2.0-flash-001";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
/// Request body cap for document uploads; base64 inflates files by about a third.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("ADAPTATION_MODE=model requires LLM_API_KEY")]
    MissingApiKey,

    #[error("could not determine a data directory; set FLASHGENIUS_DB_PATH")]
    NoDataDir,
}

/// Which adapter reorders decks at pass boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptationMode {
    Model,
    Local,
}

/// Settings for the model provider client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub llm: LlmConfig,
    pub adaptation_mode: AdaptationMode,
    pub max_document_bytes: usize,
    /// Sessions untouched this long are evicted.
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => 3000,
        };

        let db_path = match get("FLASHGENIUS_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let timeout_secs = match get("LLM_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "LLM_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let llm = LlmConfig {
            api_key: get("LLM_API_KEY"),
            base_url: get("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        let adaptation_mode = match get("ADAPTATION_MODE").map(|v| v.to_ascii_lowercase()) {
            Some(mode) if mode == "model" => {
                if llm.api_key.is_none() {
                    return Err(ConfigError::MissingApiKey);
                }
                AdaptationMode::Model
            }
            Some(mode) if mode == "local" => AdaptationMode::Local,
            Some(value) => {
                return Err(ConfigError::Invalid {
                    key: "ADAPTATION_MODE",
                    value,
                })
            }
            None if llm.api_key.is_some() => AdaptationMode::Model,
            None => AdaptationMode::Local,
        };

        let max_document_bytes = match get("MAX_DOCUMENT_BYTES") {
            Some(value) => match value.parse() {
                Ok(bytes) if bytes > 0 => bytes,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "MAX_DOCUMENT_BYTES",
                        value,
                    })
                }
            },
            None => DEFAULT_MAX_DOCUMENT_BYTES,
        };

        let session_idle_secs = match get("SESSION_IDLE_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "SESSION_IDLE_SECS",
                value,
            })?,
            None => DEFAULT_SESSION_IDLE_SECS,
        };

        Ok(Self {
            host,
            port,
            db_path,
            llm,
            adaptation_mode,
            max_document_bytes,
            session_idle: Duration::from_secs(session_idle_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_db_path() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|dir| dir.join("flashgenius").join("flashgenius.db"))
        .ok_or(ConfigError::NoDataDir)
}
