//! `eiptools webhook`

use eiptools_webhook::{
    NeynarPublisher, SIGNATURE_HEADER, WebhookEvent, WebhookRegistration, sign_payload,
};

use crate::config::EipToolsConfig;
use crate::error::Result;

/// Default endpoint for `webhook test`, derived from the server config.
pub fn local_endpoint(config: &EipToolsConfig) -> String {
    format!(
        "http://{}:{}/api/webhook",
        config.server.host, config.server.port
    )
}

/// Signed request body and signature for a sample `cast.created` event.
pub fn signed_sample(secret: &str, text: &str) -> Result<(String, String)> {
    let event = WebhookEvent::cast_created(text, "0x0000000000000000000000000000000000000000");
    let body = serde_json::to_string(&event).map_err(eiptools_core::Error::from)?;
    let signature = sign_payload(secret, body.as_bytes())?;
    Ok((body, signature))
}

/// POST a signed sample cast and print the server's answer.
pub async fn test(config: &EipToolsConfig, url: Option<String>, text: &str) -> Result<()> {
    let webhook = config.webhook_config();
    let secret = webhook.require_secret()?;
    let url = url.unwrap_or_else(|| local_endpoint(config));
    let (body, signature) = signed_sample(secret, text)?;

    log::info!("Posting sample cast to {url}");
    let response = reqwest::Client::new()
        .post(&url)
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    println!("{status}");
    println!("{text}");
    Ok(())
}

/// Register the webhook URL with the social API.
pub async fn register(config: &EipToolsConfig, url: Option<String>) -> Result<()> {
    let webhook = config.webhook_config();
    let url = url
        .or_else(|| webhook.webhook_url.clone())
        .ok_or_else(|| {
            eiptools_core::Error::config("no webhook URL; pass --url or set WEBHOOK_URL")
        })?;
    let publisher = NeynarPublisher::new(reqwest::Client::new(), webhook.require_api_key()?)?;

    let response = publisher
        .register_webhook(&WebhookRegistration::new(url))
        .await?;
    let pretty = serde_json::to_string_pretty(&response).map_err(eiptools_core::Error::from)?;
    println!("{pretty}");
    Ok(())
}
