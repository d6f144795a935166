//! Cast webhook for eiptools.
//!
//! Provides:
//! - [`SignatureLayer`] / [`SignatureService`]: Tower middleware checking the
//!   HMAC-SHA512 body signature
//! - [`extract_mentions`] and [`reply_text`]: finding EIP numbers in a cast
//!   and composing the reply
//! - [`CastPublisher`] / [`NeynarPublisher`]: posting replies and
//!   registering the webhook
//! - [`WebhookHandler`]: the `cast.created` flow end to end
//! - [`WebhookError`]: errors with their HTTP status

mod error;
mod handler;
mod mentions;
mod middleware;
mod publisher;
mod signature;

pub use error::WebhookError;
pub use handler::{CAST_CREATED, CastData, EventOutcome, WebhookEvent, WebhookHandler};
pub use mentions::{DEFAULT_SITE_URL, REPLY_HEADER, extract_mentions, mention_urls, reply_text};
pub use middleware::{MAX_BODY_BYTES, SignatureLayer, SignatureService};
pub use publisher::{
    CAST_TEXT_FILTER, CastPublisher, NEYNAR_API_BASE, NeynarPublisher, PublishedCast,
    WEBHOOK_NAME, WebhookRegistration,
};
pub use signature::{SIGNATURE_HEADER, sign_payload, verify_signature};

/// Environment variable holding the shared signing secret.
pub const ENV_WEBHOOK_SECRET: &str = "NEYNAR_WEBHOOK_SECRET";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "NEYNAR_API_KEY";
/// Environment variable holding the signer used for replies.
pub const ENV_SIGNER_UUID: &str = "NEYNAR_SIGNER_UUID";
/// Environment variable holding the public webhook URL for registration.
pub const ENV_WEBHOOK_URL: &str = "WEBHOOK_URL";

/// Secrets and endpoints for the webhook.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub secret: Option<String>,
    pub api_key: Option<String>,
    pub signer_uuid: Option<String>,
    /// Public URL the webhook is registered under.
    pub webhook_url: Option<String>,
    /// Site reply links point at.
    pub site_url: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: None,
            api_key: None,
            signer_uuid: None,
            webhook_url: None,
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }
}

impl WebhookConfig {
    /// Fill unset fields from the `NEYNAR_*` and `WEBHOOK_URL` variables.
    pub fn with_env(mut self) -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }
        self.secret = self.secret.or_else(|| var(ENV_WEBHOOK_SECRET));
        self.api_key = self.api_key.or_else(|| var(ENV_API_KEY));
        self.signer_uuid = self.signer_uuid.or_else(|| var(ENV_SIGNER_UUID));
        self.webhook_url = self.webhook_url.or_else(|| var(ENV_WEBHOOK_URL));
        self
    }

    /// The signing secret, or the error the webhook route reports without it.
    pub fn require_secret(&self) -> Result<&str, WebhookError> {
        self.secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSecret)
    }

    pub fn require_api_key(&self) -> Result<&str, WebhookError> {
        self.api_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingApiKey)
    }

    /// Layer verifying requests against this config's secret.
    pub fn signature_layer(&self) -> SignatureLayer {
        SignatureLayer::new(self.secret.clone())
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("WebhookConfig")
            .field("secret", &redact(&self.secret))
            .field("api_key", &redact(&self.api_key))
            .field("signer_uuid", &redact(&self.signer_uuid))
            .field("webhook_url", &self.webhook_url)
            .field("site_url", &self.site_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_site_url() {
        assert_eq!(WebhookConfig::default().site_url, "https://eip.tools");
    }

    #[test]
    fn test_require_secret() {
        let config = WebhookConfig {
            secret: Some(String::new()),
            ..WebhookConfig::default()
        };
        assert!(matches!(config.require_secret(), Err(WebhookError::MissingSecret)));

        let config = WebhookConfig {
            secret: Some("s".into()),
            ..WebhookConfig::default()
        };
        assert_eq!(config.require_secret().unwrap(), "s");
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let config = WebhookConfig {
            api_key: Some("from-config".into()),
            ..WebhookConfig::default()
        }
        .with_env();
        assert_eq!(config.api_key.as_deref(), Some("from-config"));
    }

    #[test]
    fn test_debug_redacts() {
        let config = WebhookConfig {
            secret: Some("hunter2".into()),
            api_key: Some("key-123".into()),
            ..WebhookConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("key-123"));
    }
}
