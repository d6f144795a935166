//! Error types for eiptools-cli

use thiserror::Error;

/// Result type alias for eiptools-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in eiptools-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from eiptools-core
    #[error(transparent)]
    Core(#[from] eiptools_core::Error),

    /// Error from the webhook client
    #[error(transparent)]
    Webhook(#[from] eiptools_webhook::WebhookError),

    /// A document reference that names no document
    #[error("Invalid document reference '{0}': expected e.g. 1559, eip-1559, erc-20 or rip-7212")]
    InvalidReference(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Core(eiptools_core::Error::http(
            e.to_string(),
            e.status().map(|s| s.as_u16()),
        ))
    }
}
