//! Tracing subscriber setup for the terminal front end.
//!
//! Logs go to the file named by `AGENT_CHAT_LOG_FILE` when set, otherwise to
//! stderr. Without `AGENT_CHAT_LOG` stderr logging is off so diagnostics never
//! interleave with the conversation; file logging defaults to `info`.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

const DEFAULT_FILE_FILTER: &str = "info";
const DEFAULT_STDERR_FILTER: &str = "off";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log file {path}: {source}")]
    CreateLogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Resolves the filter directive for the configured sink.
pub fn filter_directive(config: &EnvConfig) -> String {
    match (&config.log_filter, &config.log_file) {
        (Some(filter), _) => filter.clone(),
        (None, Some(_)) => DEFAULT_FILE_FILTER.to_string(),
        (None, None) => DEFAULT_STDERR_FILTER.to_string(),
    }
}

fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_STDERR_FILTER))
}

pub fn init(config: &EnvConfig) -> Result<(), LoggingError> {
    let filter = env_filter(&filter_directive(config));

    let installed = match &config.log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| LoggingError::CreateLogFile {
                path: path.clone(),
                source,
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init(),
    };

    installed.map_err(|error| LoggingError::Install(error.to_string()))
}
