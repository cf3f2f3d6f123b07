use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by a weather lookup. None of them are retried.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Missing credential or an invalid combination of inputs.
    #[error("{0}")]
    Configuration(String),

    /// Geocoding returned no match for the query.
    #[error("Could not find location for '{0}'")]
    NotFound(String),

    /// The API answered with a non-success status.
    #[error("{context} request failed with status {status}: {body}")]
    Http {
        context: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The request never produced a response (connect error, timeout, ...).
    #[error("Failed to send {context} request: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse {context} JSON: {source}")]
    Parse {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Payload parsed as JSON but lacks a required field.
    #[error("Malformed {context} response: {reason}")]
    Malformed {
        context: &'static str,
        reason: String,
    },

    #[error("Failed to serialize {context}: {source}")]
    Serialize {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WeatherError {
    /// Process exit code for this error: 2 for configuration, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            WeatherError::Configuration(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
