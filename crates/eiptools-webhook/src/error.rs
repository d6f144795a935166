//! Webhook error types.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

/// Errors raised while receiving a webhook call or replying to it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WebhookError {
    /// The request has no signature header.
    #[error("missing x-neynar-signature header")]
    MissingSignature,

    /// No shared secret is configured.
    #[error("webhook secret is not configured")]
    MissingSecret,

    /// The signature does not match the body.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// No signer is configured for publishing replies.
    #[error("NEYNAR_SIGNER_UUID is not configured")]
    MissingSigner,

    /// No API key is configured for the social API.
    #[error("NEYNAR_API_KEY is not configured")]
    MissingApiKey,

    /// The body is not a webhook event.
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// The social API rejected or failed a request.
    #[error("publish failed: {0}")]
    Publish(String),

    #[error(transparent)]
    Core(#[from] eiptools_core::Error),
}

impl WebhookError {
    /// HTTP status returned to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingSignature | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::MissingSecret
            | Self::MissingSigner
            | Self::MissingApiKey
            | Self::Publish(_)
            | Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short category used in JSON error bodies.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingSignature | Self::InvalidSignature => "signature",
            Self::InvalidPayload(_) => "payload",
            Self::MissingSecret | Self::MissingSigner | Self::MissingApiKey => "configuration",
            Self::Publish(_) => "publish",
            Self::Core(_) => "internal",
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Webhook error: {self}");
        } else {
            log::warn!("Webhook rejected: {self}");
        }
        let body = serde_json::json!({
            "error": {
                "category": self.category(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
