//! Shared, read-only server state.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use eiptools_catalog::{Catalogs, MarkdownSource};
use eiptools_core::service::{ServiceHandle, ServiceStatus};
use eiptools_graph::DependencyGraph;
use eiptools_webhook::{
    CastPublisher, DEFAULT_SITE_URL, PublishedCast, WebhookConfig, WebhookError, WebhookHandler,
};

/// Publisher used when no API key is configured; every reply fails.
struct UnconfiguredPublisher;

#[async_trait]
impl CastPublisher for UnconfiguredPublisher {
    async fn publish_reply(&self, _: &str, _: &str, _: &str) -> Result<PublishedCast, WebhookError> {
        Err(WebhookError::MissingApiKey)
    }
}

/// State shared by every route.
///
/// The catalogs and graph are loaded before the server starts and never
/// change while it runs.
#[derive(Clone)]
pub struct AppState {
    pub catalogs: Arc<Catalogs>,
    pub graph: Arc<DependencyGraph>,
    pub source: Arc<dyn MarkdownSource>,
    pub webhook: WebhookHandler,
    /// Loaders reported on `/health`.
    pub services: Vec<ServiceHandle>,
    /// Public base URL, used for share links.
    pub site_url: String,
    started: Instant,
}

impl AppState {
    pub fn new(
        catalogs: Catalogs,
        graph: DependencyGraph,
        source: Arc<dyn MarkdownSource>,
    ) -> Self {
        Self {
            catalogs: Arc::new(catalogs),
            graph: Arc::new(graph),
            source,
            webhook: WebhookHandler::new(WebhookConfig::default(), Arc::new(UnconfiguredPublisher)),
            services: Vec::new(),
            site_url: DEFAULT_SITE_URL.to_string(),
            started: Instant::now(),
        }
    }

    /// Webhook settings and the publisher used for replies.
    ///
    /// Without a publisher, casts that need a reply fail with a missing API
    /// key error.
    pub fn with_webhook(
        mut self,
        config: WebhookConfig,
        publisher: Option<Arc<dyn CastPublisher>>,
    ) -> Self {
        let publisher = publisher.unwrap_or_else(|| Arc::new(UnconfiguredPublisher));
        self.site_url = config.site_url.clone();
        self.webhook = WebhookHandler::new(config, publisher);
        self
    }

    pub fn with_service(mut self, handle: ServiceHandle) -> Self {
        self.services.push(handle);
        self
    }

    pub fn service_statuses(&self) -> Vec<ServiceStatus> {
        self.services.iter().map(ServiceHandle::status).collect()
    }

    /// `true` when every registered service can serve requests.
    pub fn is_healthy(&self) -> bool {
        self.services.iter().all(|s| s.state().is_available())
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("catalogs", &self.catalogs.counts())
            .field("graph_nodes", &self.graph.node_count())
            .field("source", &self.source.name())
            .field("webhook", &self.webhook)
            .field("site_url", &self.site_url)
            .finish_non_exhaustive()
    }
}
