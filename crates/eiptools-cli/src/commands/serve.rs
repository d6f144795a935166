//! `eiptools serve`

use std::sync::Arc;

use eiptools_api::AppState;
use eiptools_core::service::{ServiceHandle, ServiceState};
use eiptools_graph::{ARTIFACT_FILE, DependencyGraph, load_artifact};
use eiptools_webhook::{CastPublisher, NeynarPublisher};

use super::{load_catalogs, markdown_source};
use crate::config::EipToolsConfig;
use crate::error::Result;

/// Load catalogs and the graph artifact, then serve until Ctrl-C.
///
/// Missing catalogs or a missing graph leave the server running in a
/// degraded state rather than refusing to start.
pub async fn run(
    mut config: EipToolsConfig,
    host: Option<String>,
    port: Option<u16>,
    local: bool,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = config.bind_addr()?;

    let catalog_service = ServiceHandle::new("catalog");
    catalog_service.set_state(ServiceState::Loading);
    let catalogs = load_catalogs(&config)?;
    if catalogs.eip.is_empty() {
        catalog_service.set_state(ServiceState::Degraded(format!(
            "no EIP catalog in {}; run `eiptools index`",
            config.data_dir().display()
        )));
    } else {
        catalog_service.set_state(ServiceState::Ready);
    }

    let graph_service = ServiceHandle::new("graph");
    graph_service.set_state(ServiceState::Loading);
    let artifact = config.data_dir().join(ARTIFACT_FILE);
    let graph = if artifact.exists() {
        let graph = load_artifact(&artifact)?;
        graph_service.set_state(ServiceState::Ready);
        graph
    } else {
        graph_service.set_state(ServiceState::Degraded(format!(
            "{} missing; run `eiptools graph build`",
            artifact.display()
        )));
        DependencyGraph::new()
    };

    let webhook = config.webhook_config();
    let publisher: Option<Arc<dyn CastPublisher>> = match webhook.require_api_key() {
        Ok(key) => Some(Arc::new(NeynarPublisher::new(reqwest::Client::new(), key)?)),
        Err(_) => {
            log::warn!("No API key configured; the webhook will not reply to casts");
            None
        }
    };
    if webhook.secret.is_none() {
        log::warn!("No webhook secret configured; webhook requests will be rejected");
    }

    log::info!(
        "Serving {:?} with {} graph nodes",
        catalogs.counts(),
        graph.node_count()
    );
    let state = AppState::new(catalogs, graph, markdown_source(&config, local)?)
        .with_webhook(webhook, publisher)
        .with_service(catalog_service)
        .with_service(graph_service);

    eiptools_api::serve(state, addr).await?;
    Ok(())
}
