//! HTTP routes and handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use eiptools_catalog::{
    FetchedDocument, fetch_document, hard_fork, import_shared, parse_shared_params, resolve_hard_fork,
    share_link, share_query,
};
use eiptools_core::{DocKind, extract_doc_number, node_id};
use eiptools_graph::{compute_stats, hourglass_layout, neighborhood, referenced_by, requires, transitive_requires};
use eiptools_webhook::WebhookEvent;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, Result};
use crate::page::{document_page, not_found_page};
use crate::state::AppState;

type SharedState = State<Arc<AppState>>;

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let webhook = Router::new()
        .route("/api/webhook", post(webhook))
        .route_layer(state.webhook.config().signature_layer());

    Router::new()
        .route("/health", get(health))
        // Documents
        .route("/{number}", get(redirect_number))
        .route("/eip/{id}", get(eip_page))
        .route("/rip/{id}", get(rip_page))
        .route("/caip/{id}", get(caip_page))
        // Graph
        .route("/api/graph", get(graph_artifact))
        .route("/api/graph/stats", get(graph_stats))
        .route("/api/graph/{id}", get(graph_node))
        .route("/api/graph/{id}/neighborhood", get(graph_neighborhood))
        .route("/api/graph/{id}/transitive", get(graph_transitive))
        // Catalog, hard forks, reading lists
        .route("/api/catalog/{kind}", get(catalog_listing))
        .route("/api/hardfork/{name}", get(hard_fork_group))
        .route("/api/shared", get(shared_list))
        .merge(webhook)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// =============================================================================
// Health
// =============================================================================

async fn health(State(state): SharedState) -> impl IntoResponse {
    let healthy = state.is_healthy();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = serde_json::json!({
        "status": if healthy { "ok" } else { "degraded" },
        "service": "eiptools",
        "catalogs": state.catalogs.counts(),
        "graph": {
            "nodes": state.graph.node_count(),
            "edges": state.graph.edge_count(),
        },
        "services": state.service_statuses(),
        "uptime_secs": state.uptime_secs(),
    });
    (status, Json(body))
}

// =============================================================================
// Documents
// =============================================================================

async fn redirect_number(State(state): SharedState, Path(number): Path<String>) -> Result<Redirect> {
    let n: u32 = number
        .parse()
        .map_err(|_| ApiError::not_found(format!("no page at /{number}")))?;
    let kind = state
        .catalogs
        .resolve_kind(n)
        .ok_or_else(|| ApiError::not_found(format!("no document numbered {n}")))?;
    Ok(Redirect::temporary(&kind.site_path(n)))
}

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    format: Option<String>,
}

impl PageParams {
    fn wants_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// EIP pages also answer to `erc-{n}`.
async fn eip_page(
    state: SharedState,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response> {
    let number = extract_doc_number(&id, "eip").or_else(|_| extract_doc_number(&id, "erc"))?;
    document(state, DocKind::Eip, number, params).await
}

async fn rip_page(
    state: SharedState,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response> {
    let number = extract_doc_number(&id, "rip")?;
    document(state, DocKind::Rip, number, params).await
}

async fn caip_page(
    state: SharedState,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response> {
    let number = extract_doc_number(&id, "caip")?;
    document(state, DocKind::Caip, number, params).await
}

async fn document(
    State(state): SharedState,
    kind: DocKind,
    number: u32,
    params: PageParams,
) -> Result<Response> {
    let fetched = fetch_document(state.source.as_ref(), &state.catalogs, kind, number).await?;

    let doc = match fetched {
        FetchedDocument::Found(doc) => doc,
        FetchedDocument::NotFound { .. } if params.wants_json() => {
            return Err(ApiError::not_found(format!("{kind}-{number} not found")));
        }
        FetchedDocument::NotFound { .. } => {
            return Ok((StatusCode::NOT_FOUND, Html(not_found_page(kind, number))).into_response());
        }
    };

    if params.wants_json() {
        let (prev, next) = state.catalogs.get(kind).neighbors(number);
        let body = serde_json::json!({
            "document": doc,
            "prev": prev,
            "next": next,
        });
        return Ok(Json(body).into_response());
    }

    Ok(Html(document_page(&doc, &state.catalogs)).into_response())
}

// =============================================================================
// Graph
// =============================================================================

async fn graph_artifact(State(state): SharedState) -> impl IntoResponse {
    Json(state.graph.to_artifact())
}

#[derive(Debug, Deserialize)]
struct StatsParams {
    top: Option<usize>,
}

async fn graph_stats(State(state): SharedState, Query(params): Query<StatsParams>) -> impl IntoResponse {
    Json(compute_stats(&state.graph, params.top.unwrap_or(10)))
}

fn graph_number(id: &str) -> Result<u32> {
    Ok(extract_doc_number(id, "eip")?)
}

async fn graph_node(State(state): SharedState, Path(id): Path<String>) -> Result<Json<serde_json::Value>> {
    let n = graph_number(&id)?;
    let graph = &state.graph;
    let node = graph
        .get_by_number(n)
        .ok_or_else(|| ApiError::not_found(format!("{} is not in the graph", node_id(n))))?;

    Ok(Json(serde_json::json!({
        "node": node,
        "requires": requires(graph, n)?,
        "referencedBy": referenced_by(graph, n)?,
        "layout": hourglass_layout(graph, n)?,
    })))
}

#[derive(Debug, Deserialize)]
struct NeighborhoodParams {
    radius: Option<usize>,
}

async fn graph_neighborhood(
    State(state): SharedState,
    Path(id): Path<String>,
    Query(params): Query<NeighborhoodParams>,
) -> Result<impl IntoResponse> {
    let n = graph_number(&id)?;
    let result = neighborhood(&state.graph, &node_id(n), params.radius.unwrap_or(1))?;
    Ok(Json(result))
}

async fn graph_transitive(State(state): SharedState, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let n = graph_number(&id)?;
    Ok(Json(transitive_requires(&state.graph, n)?))
}

// =============================================================================
// Catalog, hard forks, shared lists
// =============================================================================

async fn catalog_listing(State(state): SharedState, Path(kind): Path<String>) -> Result<impl IntoResponse> {
    let kind: DocKind = kind.parse()?;
    let catalog = state.catalogs.get(kind);
    Ok(Json(serde_json::json!({
        "kind": kind,
        "count": catalog.len(),
        "entries": catalog.entries(),
    })))
}

async fn hard_fork_group(State(state): SharedState, Path(name): Path<String>) -> Result<impl IntoResponse> {
    let meta = resolve_hard_fork(&name)
        .ok_or_else(|| ApiError::bad_request(format!("unknown hard fork '{name}'")))?;
    Ok(Json(hard_fork(&state.catalogs, meta)?))
}

async fn shared_list(
    State(state): SharedState,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let items = parse_shared_params(&params);
    let bookmarks = import_shared(&items, &state.catalogs);
    Json(serde_json::json!({
        "items": items,
        "bookmarks": bookmarks,
        "shareQuery": share_query(&bookmarks),
        "shareLink": share_link(&state.site_url, &bookmarks),
    }))
}

// =============================================================================
// Webhook
// =============================================================================

/// Runs after [`eiptools_webhook::SignatureLayer`] has verified the body.
async fn webhook(State(state): SharedState, body: Bytes) -> Result<impl IntoResponse> {
    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| eiptools_webhook::WebhookError::InvalidPayload(e.to_string()))?;

    let catalogs = Arc::clone(&state.catalogs);
    let outcome = state
        .webhook
        .handle_event(&event, move |n| catalogs.eip.contains(n))
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "result": outcome,
    })))
}
