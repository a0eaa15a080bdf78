//! Route handlers.
//!
//! Every handler that takes an identifier parses it into an [`AssetId`] first,
//! so a malformed id is answered with 400 before the executor is touched.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use assetviz_core::{AssetId, ValidationError};
use assetviz_graph::GraphAssembly;

use crate::error::ApiError;
use crate::responses::{self, json_response, AssetFilter};
use crate::state::AppState;

/// API routes plus the health probe.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/graph", get(graph))
        .route("/api/assets", get(assets))
        .route("/api/asset/:id", get(asset_detail))
        .route("/api/neighbors/:id", get(neighbors))
        .route("/api/asset-types", get(asset_types))
        .route("/api/edges/:source/:target", get(edge_detail))
        .route("/api/asset/", get(missing_id))
        .route("/api/neighbors/", get(missing_id))
        .route("/api/edges/", get(missing_id))
        .route("/api/edges/:source", get(missing_id))
        .route("/api/edges/:source/", get(missing_id))
        .route("/health", get(health_check))
}

/// Identifier routes with an empty or absent id segment.
async fn missing_id() -> ApiError {
    ValidationError::InvalidFormat {
        value: String::new(),
    }
    .into()
}

async fn graph(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = state.executor.fetch_connectivity().await?;
    let assembly = GraphAssembly::from_rows(&rows);
    let graph = assembly.display_graph();
    info!(
        nodes = assembly.node_count(),
        edges = graph.edges.len(),
        connections = assembly.connection_count(),
        "Served connectivity graph"
    );
    json_response(&responses::build_graph(&graph))
}

async fn assets(
    State(state): State<AppState>,
    Query(filter): Query<AssetFilter>,
) -> Result<Response, ApiError> {
    let all = state.executor.fetch_assets().await?;
    let body = responses::build_assets_list(all, &filter);
    info!(total = body.total, filtered = body.filtered, "Served asset list");
    json_response(&body)
}

async fn asset_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = AssetId::parse(&id)?;
    let detail = state
        .executor
        .fetch_asset_detail(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("asset {id}")))?;
    info!(asset_id = %id, "Served asset detail");
    json_response(&responses::build_asset_detail(detail))
}

async fn neighbors(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = AssetId::parse(&id)?;
    let found = state.executor.fetch_neighbors(&id).await?;
    info!(asset_id = %id, total = found.len(), "Served neighbors");
    json_response(&responses::build_neighbors(found))
}

async fn asset_types(State(state): State<AppState>) -> Result<Response, ApiError> {
    let types = state.executor.fetch_asset_types().await?;
    info!(total = types.len(), "Served asset types");
    json_response(&responses::build_asset_types(types))
}

async fn edge_detail(
    State(state): State<AppState>,
    Path((source, target)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let source = AssetId::parse(&source)?;
    let target = AssetId::parse(&target)?;

    let pair = state
        .executor
        .fetch_connections_between(&source, &target)
        .await?;
    let assembly = GraphAssembly::from_rows(&pair.rows);
    let connections = assembly.connections_between(source.as_str(), target.as_str());
    if connections.is_empty() {
        return Err(ApiError::NotFound(format!(
            "connection {source} -> {target}"
        )));
    }

    let body = responses::build_edge_detail(
        &assembly,
        (source.as_str(), pair.source_description.as_deref()),
        (target.as_str(), pair.target_description.as_deref()),
        connections,
    );
    info!(source = %source, target = %target, total = body.total, "Served edge detail");
    json_response(&body)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.executor.check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok" })),
        Err(e) => {
            tracing::warn!(
                namespace = state.executor.namespace(),
                error = %e,
                "Health check failed"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                }),
            )
        }
    }
}
