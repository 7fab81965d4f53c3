//! Error types for the publish flow

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for publish operations
pub type Result<T> = std::result::Result<T, PublishError>;

/// Everything that can abort a publish run. None of these are retried.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("invalid --{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("API token rejected: received a non-200 response ({status}); output: {body}")]
    Authentication { status: StatusCode, body: String },

    #[error("received a non-200 response ({status}); output: {body}")]
    Remote { status: StatusCode, body: String },

    #[error("filesystem error at '{}': {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("mismatching schema types: configured type is '{expected}' while schema id '{schema_id}' is '{actual}'")]
    Mismatch {
        schema_id: String,
        expected: String,
        actual: String,
    },

    #[error("unable to perform HTTP request: {0}")]
    Http(#[from] reqwest::Error),
}

impl PublishError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        PublishError::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PublishError::Filesystem {
            path: path.into(),
            source,
        }
    }
}
