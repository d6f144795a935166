//! Error types for eiptools-core.
//!
//! Every library crate in the workspace returns [`Result`], wrapping its own
//! failure modes into one of these variants through the helper constructors.

use std::path::{Path, PathBuf};

/// Result type alias for eiptools operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across eiptools.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error without path context.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific file or directory.
    #[error("I/O error at {path}: {source}")]
    IoWithPath {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Content could not be parsed.
    #[error("Parse error: {message}")]
    Parse {
        /// What went wrong.
        message: String,
    },

    /// Configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic.
        message: String,
    },

    /// A requested item does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of item (e.g. "document", "node").
        kind: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// Caller supplied an invalid value.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// Outbound HTTP request failed.
    #[error("HTTP error: {message}")]
    Http {
        /// Human-readable error message.
        message: String,
        /// Response status, when one was received.
        status: Option<u16>,
    },
}

impl Error {
    /// Creates an I/O error carrying the path that failed.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an HTTP error.
    pub fn http<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        Error::Http {
            message: message.into(),
            status,
        }
    }

    /// Returns `true` for errors caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. } | Error::InvalidInput { .. } | Error::Parse { .. }
        )
    }
}
