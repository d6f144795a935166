//! Processing verified webhook events.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::mentions::{extract_mentions, mention_urls, reply_text};
use crate::publisher::CastPublisher;
use crate::{WebhookConfig, WebhookError};

/// Event type that triggers a reply.
pub const CAST_CREATED: &str = "cast.created";

/// A webhook event envelope.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of a `cast.created` event.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CastData {
    pub text: String,
    pub hash: String,
}

impl WebhookEvent {
    /// A `cast.created` event for the given text and hash.
    pub fn cast_created(text: impl Into<String>, hash: impl Into<String>) -> Self {
        let data = CastData {
            text: text.into(),
            hash: hash.into(),
        };
        Self {
            event_type: CAST_CREATED.to_string(),
            data: serde_json::to_value(data).unwrap_or_default(),
        }
    }
}

/// What happened to an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    /// Not a `cast.created` event.
    Ignored { event_type: String },
    /// No known document was mentioned.
    NoMentions,
    Replied {
        numbers: Vec<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reply_hash: Option<String>,
    },
}

/// Replies to casts that mention known EIPs.
#[derive(Clone)]
pub struct WebhookHandler {
    config: WebhookConfig,
    publisher: Arc<dyn CastPublisher>,
}

impl std::fmt::Debug for WebhookHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookHandler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WebhookHandler {
    pub fn new(config: WebhookConfig, publisher: Arc<dyn CastPublisher>) -> Self {
        Self { config, publisher }
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// Handle one verified event.
    ///
    /// Only `cast.created` events are processed. A reply is posted only
    /// when at least one known number is mentioned; posting without a
    /// configured signer is an error.
    pub async fn handle_event(
        &self,
        event: &WebhookEvent,
        is_known: impl Fn(u32) -> bool + Send,
    ) -> Result<EventOutcome, WebhookError> {
        if event.event_type != CAST_CREATED {
            log::debug!("Ignoring webhook event '{}'", event.event_type);
            return Ok(EventOutcome::Ignored {
                event_type: event.event_type.clone(),
            });
        }

        let cast: CastData = serde_json::from_value(event.data.clone())
            .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

        let numbers = extract_mentions(&cast.text, is_known);
        if numbers.is_empty() {
            return Ok(EventOutcome::NoMentions);
        }

        let signer = self
            .config
            .signer_uuid
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSigner)?;

        let urls = mention_urls(&self.config.site_url, &numbers);
        let reply = self
            .publisher
            .publish_reply(signer, &reply_text(&urls), &cast.hash)
            .await?;
        log::info!(
            "Replied to cast {} with {} link(s){}",
            cast.hash,
            urls.len(),
            reply
                .hash
                .as_deref()
                .map(|h| format!(" as {h}"))
                .unwrap_or_default()
        );

        Ok(EventOutcome::Replied {
            numbers,
            reply_hash: reply.hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::PublishedCast;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl CastPublisher for RecordingPublisher {
        async fn publish_reply(
            &self,
            signer_uuid: &str,
            text: &str,
            parent: &str,
        ) -> Result<PublishedCast, WebhookError> {
            self.sent.lock().unwrap().push((
                signer_uuid.to_string(),
                text.to_string(),
                parent.to_string(),
            ));
            Ok(PublishedCast {
                hash: Some("0xreply".to_string()),
            })
        }
    }

    fn config(signer: Option<&str>) -> WebhookConfig {
        WebhookConfig {
            signer_uuid: signer.map(str::to_string),
            ..WebhookConfig::default()
        }
    }

    fn known(n: u32) -> bool {
        matches!(n, 1559 | 7702)
    }

    #[tokio::test]
    async fn test_replies_with_links() {
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = WebhookHandler::new(config(Some("signer-1")), publisher.clone());

        let event = WebhookEvent::cast_created("Pectra ships EIP-7702 at epoch 364032", "0xc95b");
        let outcome = handler.handle_event(&event, known).await.unwrap();
        assert_eq!(
            outcome,
            EventOutcome::Replied {
                numbers: vec![7702],
                reply_hash: Some("0xreply".into())
            }
        );

        let sent = publisher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "signer-1");
        assert!(sent[0].1.ends_with("\n\nhttps://eip.tools/eip/7702"));
        assert_eq!(sent[0].2, "0xc95b");
    }

    #[tokio::test]
    async fn test_ignores_other_events() {
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = WebhookHandler::new(config(Some("s")), publisher.clone());
        let event = WebhookEvent {
            event_type: "follow.created".into(),
            data: serde_json::json!({}),
        };
        let outcome = handler.handle_event(&event, known).await.unwrap();
        assert!(matches!(outcome, EventOutcome::Ignored { .. }));
        assert!(publisher.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_mentions_does_not_need_signer() {
        let handler = WebhookHandler::new(config(None), Arc::new(RecordingPublisher::default()));
        let event = WebhookEvent::cast_created("gm", "0x1");
        assert_eq!(
            handler.handle_event(&event, known).await.unwrap(),
            EventOutcome::NoMentions
        );
    }

    #[tokio::test]
    async fn test_missing_signer_is_error() {
        let handler = WebhookHandler::new(config(None), Arc::new(RecordingPublisher::default()));
        let event = WebhookEvent::cast_created("EIP-1559", "0x1");
        let err = handler.handle_event(&event, known).await.unwrap_err();
        assert!(matches!(err, WebhookError::MissingSigner));
    }

    #[tokio::test]
    async fn test_malformed_cast_is_bad_payload() {
        let handler = WebhookHandler::new(config(Some("s")), Arc::new(RecordingPublisher::default()));
        let event = WebhookEvent {
            event_type: CAST_CREATED.into(),
            data: serde_json::json!({"text": 5}),
        };
        let err = handler.handle_event(&event, known).await.unwrap_err();
        assert!(matches!(err, WebhookError::InvalidPayload(_)));
    }
}
