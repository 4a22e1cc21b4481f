//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chat_api::{ChatApiConfig, DEFAULT_BASE_URL};
use chat_session::transports::DEFAULT_TRANSPORT_ID;
use thiserror::Error;

use crate::view::{ViewOptions, DEFAULT_COLUMNS};

pub const BASE_URL_ENV_VAR: &str = "AGENT_CHAT_BASE_URL";
pub const TIMEOUT_ENV_VAR: &str = "AGENT_CHAT_TIMEOUT_SEC";
pub const TRANSPORT_ENV_VAR: &str = "AGENT_CHAT_TRANSPORT";
pub const LOG_ENV_VAR: &str = "AGENT_CHAT_LOG";
pub const LOG_FILE_ENV_VAR: &str = "AGENT_CHAT_LOG_FILE";
pub const NO_COLOR_ENV_VAR: &str = "AGENT_CHAT_NO_COLOR";
pub const COLUMNS_ENV_VAR: &str = "COLUMNS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AGENT_CHAT_TIMEOUT_SEC must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub base_url: String,
    /// `None` waits for the backend indefinitely.
    pub timeout: Option<Duration>,
    pub transport_id: String,
    pub log_filter: Option<String>,
    pub log_file: Option<PathBuf>,
    pub color: bool,
    pub columns: usize,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_string_opt(BASE_URL_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: parse_timeout(env_string_opt(TIMEOUT_ENV_VAR))?,
            transport_id: env_string_opt(TRANSPORT_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_TRANSPORT_ID.to_string()),
            log_filter: env_string_opt(LOG_ENV_VAR),
            log_file: env_string_opt(LOG_FILE_ENV_VAR).map(PathBuf::from),
            color: !env_flag(NO_COLOR_ENV_VAR),
            columns: env_string_opt(COLUMNS_ENV_VAR)
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|columns| *columns > 0)
                .unwrap_or(DEFAULT_COLUMNS),
        })
    }

    pub fn api_config(&self) -> ChatApiConfig {
        let config = ChatApiConfig::new(self.base_url.clone());
        match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            columns: self.columns,
            color: self.color,
        }
    }
}

fn parse_timeout(raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => {
            Ok(Some(Duration::from_secs_f64(seconds)))
        }
        _ => Err(ConfigError::InvalidTimeout { value: raw }),
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
