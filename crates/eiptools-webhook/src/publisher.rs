//! Publishing replies and registering the webhook with the social API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::WebhookError;

/// Base URL of the Neynar API.
pub const NEYNAR_API_BASE: &str = "https://api.neynar.com";

/// Name the webhook is registered under.
pub const WEBHOOK_NAME: &str = "eip-tools-webhook";

/// Server-side filter: only casts mentioning EIP or ERC are delivered.
pub const CAST_TEXT_FILTER: &str = r"(?i)\b(eip|erc)(\b|[-d])";

/// A cast that was published.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PublishedCast {
    #[serde(default)]
    pub hash: Option<String>,
}

/// Something that can post a reply cast.
#[async_trait]
pub trait CastPublisher: Send + Sync {
    /// Post `text` as a reply to the cast with hash `parent`.
    async fn publish_reply(
        &self,
        signer_uuid: &str,
        text: &str,
        parent: &str,
    ) -> Result<PublishedCast, WebhookError>;
}

#[derive(Serialize)]
struct CastRequest<'a> {
    signer_uuid: &'a str,
    text: &'a str,
    parent: &'a str,
}

#[derive(Deserialize)]
struct CastResponse {
    #[serde(default)]
    cast: Option<PublishedCast>,
}

/// Webhook registration request body.
#[derive(Clone, Debug, Serialize)]
pub struct WebhookRegistration {
    pub name: String,
    pub url: String,
    pub subscription: serde_json::Value,
}

impl WebhookRegistration {
    /// Registration for `url`, subscribed to casts matching [`CAST_TEXT_FILTER`].
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: WEBHOOK_NAME.to_string(),
            url: url.into(),
            subscription: serde_json::json!({
                "cast.created": { "text": CAST_TEXT_FILTER }
            }),
        }
    }
}

/// Neynar API client.
#[derive(Clone)]
pub struct NeynarPublisher {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for NeynarPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeynarPublisher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl NeynarPublisher {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Result<Self, WebhookError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(WebhookError::MissingApiKey);
        }
        Ok(Self {
            client,
            api_key,
            base_url: NEYNAR_API_BASE.to_string(),
        })
    }

    /// Point the client at another API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, WebhookError> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| WebhookError::Publish(format!("POST {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(WebhookError::Publish(format!(
                "POST {url} returned {status}: {detail}"
            )));
        }
        Ok(response)
    }

    /// Register `registration` and return the API's response.
    pub async fn register_webhook(
        &self,
        registration: &WebhookRegistration,
    ) -> Result<serde_json::Value, WebhookError> {
        log::info!(
            "Registering webhook '{}' for {}",
            registration.name,
            registration.url
        );
        self.post_json("/v2/farcaster/webhook", registration)
            .await?
            .json()
            .await
            .map_err(|e| WebhookError::Publish(format!("reading webhook response: {e}")))
    }
}

#[async_trait]
impl CastPublisher for NeynarPublisher {
    async fn publish_reply(
        &self,
        signer_uuid: &str,
        text: &str,
        parent: &str,
    ) -> Result<PublishedCast, WebhookError> {
        let body = CastRequest {
            signer_uuid,
            text,
            parent,
        };
        let response: CastResponse = self
            .post_json("/v2/farcaster/cast", &body)
            .await?
            .json()
            .await
            .map_err(|e| WebhookError::Publish(format!("reading cast response: {e}")))?;
        Ok(response.cast.unwrap_or_default())
    }
}
