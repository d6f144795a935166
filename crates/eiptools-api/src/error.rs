//! Error types for eiptools-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eiptools_webhook::WebhookError;
use thiserror::Error;

/// Result type alias for route handlers
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by route handlers
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] eiptools_core::Error),

    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        use eiptools_core::Error as Core;
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Core(Core::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Core(Core::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            Self::Core(Core::Http { .. }) => StatusCode::BAD_GATEWAY,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Webhook(e) => e.status_code(),
        }
    }

    pub fn category(&self) -> &'static str {
        use eiptools_core::Error as Core;
        match self {
            Self::NotFound(_) | Self::Core(Core::NotFound { .. }) => "not_found",
            Self::BadRequest(_) | Self::Core(Core::InvalidInput { .. }) => "bad_request",
            Self::Core(Core::Http { .. }) => "upstream",
            Self::Core(_) => "internal",
            Self::Webhook(e) => e.category(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {self}");
        } else {
            log::debug!("Request rejected ({status}): {self}");
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
