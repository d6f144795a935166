//! Tower middleware that verifies webhook signatures.
//!
//! `SignatureLayer` buffers the request body, checks it against the
//! `x-neynar-signature` header, and hands the same bytes to the inner
//! service. Rejections never reach the inner service.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::Request;
use tower::{Layer, Service};

use crate::signature::{SIGNATURE_HEADER, verify_signature};
use crate::WebhookError;

/// Largest webhook body accepted.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Tower `Layer` that wraps services with signature verification.
#[derive(Clone)]
pub struct SignatureLayer {
    secret: Option<Arc<str>>,
}

impl SignatureLayer {
    /// A layer checking against `secret`; `None` rejects every request with 500.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()).map(Arc::from),
        }
    }
}

impl std::fmt::Debug for SignatureLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureLayer")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl<S> Layer<S> for SignatureLayer {
    type Service = SignatureService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SignatureService {
            inner,
            secret: self.secret.clone(),
        }
    }
}

/// Tower `Service` that verifies the body signature before forwarding.
#[derive(Clone)]
pub struct SignatureService<S> {
    inner: S,
    secret: Option<Arc<str>>,
}

impl<S> Service<Request<Body>> for SignatureService<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let secret = self.secret.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();

            let Some(signature) = parts
                .headers
                .get(SIGNATURE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
            else {
                return Ok(WebhookError::MissingSignature.into_response());
            };

            let Some(secret) = secret else {
                return Ok(WebhookError::MissingSecret.into_response());
            };

            let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    return Ok(
                        WebhookError::InvalidPayload(format!("unreadable body: {e}"))
                            .into_response(),
                    );
                }
            };

            if let Err(e) = verify_signature(&secret, &bytes, &signature) {
                return Ok(e.into_response());
            }

            log::debug!("Webhook signature verified ({} bytes)", bytes.len());
            let req = Request::from_parts(parts, Body::from(bytes));
            let resp = inner
                .call(req)
                .await
                .unwrap_or_else(|infallible| match infallible {});
            Ok(resp.into_response())
        })
    }
}
