//! Error types for the alt-text pipeline.
//!
//! Pipeline errors follow the failure modes of a remote HTTP service:
//! transport failures, undecodable bodies, well-formed bodies with missing
//! fields, local filesystem problems and missing configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for alttext operations.
#[derive(Error, Debug)]
pub enum AltTextError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while generating, persisting or publishing alt text.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Connection, DNS or timeout failure, or a non-2xx HTTP status.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        status_code: Option<u16>,
        body: Option<String>,
    },

    /// A response body was not valid JSON.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// A response was valid JSON but lacked an expected field.
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Directory or file creation, read or write failed.
    #[error("Filesystem error for {path}: {message}")]
    Filesystem { path: PathBuf, message: String },

    /// A required setting or credential is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PipelineError {
    /// Transport error for a request that never produced a response.
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status_code: None,
            body: None,
        }
    }

    /// Transport error for a response with a non-2xx status.
    pub(crate) fn status(context: &str, status: reqwest::StatusCode, body: String) -> Self {
        Self::Transport {
            message: format!("{context} HTTP {status}: {body}"),
            status_code: Some(status.as_u16()),
            body: Some(body),
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Filesystem {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// HTTP status code, if the error came from a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

/// A streamed response that failed part-way through.
///
/// Carries the text aggregated from every fragment received before the
/// failure so callers can decide whether it is usable.
#[derive(Error, Debug)]
#[error("{source} ({} chars of partial text received)", .partial.chars().count())]
pub struct AggregateError {
    /// Trimmed concatenation of the fragments received before the error.
    pub partial: String,
    /// The error that ended the stream.
    #[source]
    pub source: PipelineError,
}

impl From<AggregateError> for PipelineError {
    fn from(err: AggregateError) -> Self {
        err.source
    }
}

/// Convenience type alias for alttext results.
pub type Result<T> = std::result::Result<T, AltTextError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
