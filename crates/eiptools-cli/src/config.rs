//! Configuration for the `eiptools` command.
//!
//! Loaded from `~/.config/eiptools/config.toml` (or `--config`,
//! or `EIPTOOLS_CONFIG`), then overridden from `EIPTOOLS_*` variables:
//! `EIPTOOLS_DATA_DIR`, `EIPTOOLS_SERVER__PORT`, `EIPTOOLS_WEBHOOK__URL`.
//! Webhook secrets are never stored in the file; they come from the
//! `NEYNAR_*` variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use eiptools_core::util::paths::{expand_tilde, project_data_dir};
use eiptools_core::{ConfigManager, Error, Result};
use eiptools_webhook::{DEFAULT_SITE_URL, WebhookConfig};
use serde::{Deserialize, Serialize};

/// Bookmark store file name inside the data directory.
pub const BOOKMARKS_FILE: &str = "bookmarks.json";

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EipToolsConfig {
    /// Holds the catalog files, the graph artifact, and bookmarks.
    pub data_dir: String,
    /// Directory containing `EIPs/`, `ERCs/`, `RIPs/` and `CAIPs/` clones.
    pub checkouts_dir: String,
    /// Timeout for upstream markdown fetches.
    pub fetch_timeout_secs: u64,
    pub server: ServerConfig,
    pub webhook: WebhookSettings,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL used in reply and share links.
    pub site_url: String,
}

/// Non-secret webhook settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    /// Public URL the webhook is registered under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for EipToolsConfig {
    fn default() -> Self {
        let data_dir = project_data_dir(Self::project_name())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.local/share/eiptools".to_string());
        Self {
            data_dir,
            checkouts_dir: "~/src/ethereum".to_string(),
            fetch_timeout_secs: 15,
            server: ServerConfig::default(),
            webhook: WebhookSettings::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }
}

impl ConfigManager for EipToolsConfig {
    fn project_name() -> &'static str {
        "eiptools"
    }
}

impl EipToolsConfig {
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }

    pub fn checkouts_dir(&self) -> PathBuf {
        expand_tilde(&self.checkouts_dir)
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        self.data_dir().join(BOOKMARKS_FILE)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                Error::config(format!(
                    "invalid server address {}:{}: {e}",
                    self.server.host, self.server.port
                ))
            })
    }

    /// Webhook settings with secrets filled in from the environment.
    pub fn webhook_config(&self) -> WebhookConfig {
        WebhookConfig {
            webhook_url: self.webhook.url.clone(),
            site_url: self.server.site_url.clone(),
            ..WebhookConfig::default()
        }
        .with_env()
    }
}
