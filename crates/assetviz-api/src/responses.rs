//! Response shapes and the pure builders that produce them.
//!
//! One builder per endpoint. Builders never touch the store; they map decoded
//! records into the wire shape and compute the derived counts.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use assetviz_core::{
    AssetDetailRecord, AssetNode, AssetTypeRecord, ConnectionEdge, NeighborRecord, PairKey,
};
use assetviz_graph::{DisplayGraph, GraphAssembly};

use crate::error::ApiError;

/// Serialize `value` into a 200 JSON response, surfacing encoding failures
/// as [`ApiError::Serialization`].
pub fn json_response<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(value).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

// ── Connectivity graph ───────────────────────────────────────────

/// Cytoscape-compatible element list.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphNode {
    pub data: GraphNodeData,
}

/// Everything the client needs to style a node: type colour, label,
/// priority border, entrance/target shape, vulnerability marker.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphNodeData {
    pub id: String,
    pub label: String,
    pub asset_type: Option<String>,
    pub is_entrance: bool,
    pub is_target: bool,
    pub priority: i64,
    pub has_vulnerability: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphEdge {
    pub data: GraphEdgeData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphEdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    pub connection_count: usize,
}

pub fn build_graph(graph: &DisplayGraph) -> GraphResponse {
    let nodes = graph
        .nodes
        .iter()
        .map(|n| GraphNode {
            data: GraphNodeData {
                id: n.asset_id.clone(),
                label: n.display_label().to_string(),
                asset_type: n.asset_type.clone(),
                is_entrance: n.is_entrance,
                is_target: n.is_target,
                priority: n.priority,
                has_vulnerability: n.has_vulnerability,
            },
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|e| GraphEdge {
            data: GraphEdgeData {
                id: PairKey::new(e.source.as_str(), e.target.as_str()).to_string(),
                source: e.source.clone(),
                target: e.target.clone(),
                connection_count: e.connection_count,
            },
        })
        .collect();

    GraphResponse { nodes, edges }
}

// ── Asset list ───────────────────────────────────────────────────

/// Optional filters on the asset list. Empty values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFilter {
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub search: Option<String>,
}

impl AssetFilter {
    fn type_name(&self) -> Option<&str> {
        self.asset_type.as_deref().filter(|s| !s.is_empty())
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Type must match exactly; search matches id or name, case-insensitively.
    pub fn matches(&self, asset: &AssetNode) -> bool {
        if let Some(wanted) = self.type_name() {
            if asset.asset_type.as_deref() != Some(wanted) {
                return false;
            }
        }
        match self.search_term() {
            Some(term) => {
                asset.asset_id.to_lowercase().contains(&term)
                    || asset.asset_name.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetsListResponse {
    pub assets: Vec<AssetNode>,
    pub total: usize,
    pub filtered: usize,
}

pub fn build_assets_list(assets: Vec<AssetNode>, filter: &AssetFilter) -> AssetsListResponse {
    let total = assets.len();
    let assets: Vec<AssetNode> = assets.into_iter().filter(|a| filter.matches(a)).collect();
    AssetsListResponse {
        filtered: assets.len(),
        assets,
        total,
    }
}

// ── Asset detail ─────────────────────────────────────────────────

/// Flat detail object; the client reads `asset_id`, `asset_name`, … directly.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssetDetailResponse {
    pub asset_id: String,
    pub asset_name: String,
    pub asset_description: String,
    pub asset_note: String,
    pub asset_type: String,
    pub segment_name: String,
    pub is_entrance: bool,
    pub is_target: bool,
    pub priority: i64,
    pub has_vulnerability: bool,
    pub ttb: i64,
}

pub fn build_asset_detail(detail: AssetDetailRecord) -> AssetDetailResponse {
    AssetDetailResponse {
        asset_id: detail.asset_id,
        asset_name: detail.asset_name,
        asset_description: detail.asset_description.unwrap_or_default(),
        asset_note: detail.asset_note.unwrap_or_default(),
        asset_type: detail.asset_type.unwrap_or_default(),
        segment_name: detail.segment_name.unwrap_or_default(),
        is_entrance: detail.is_entrance,
        is_target: detail.is_target,
        priority: detail.priority,
        has_vulnerability: detail.has_vulnerability,
        ttb: detail.ttb,
    }
}

// ── Neighbors ────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct NeighborsResponse {
    pub neighbors: Vec<NeighborRecord>,
    pub total: usize,
}

pub fn build_neighbors(neighbors: Vec<NeighborRecord>) -> NeighborsResponse {
    NeighborsResponse {
        total: neighbors.len(),
        neighbors,
    }
}

// ── Asset types ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetTypesResponse {
    pub asset_types: Vec<AssetTypeRecord>,
    pub total: usize,
}

pub fn build_asset_types(asset_types: Vec<AssetTypeRecord>) -> AssetTypesResponse {
    AssetTypesResponse {
        total: asset_types.len(),
        asset_types,
    }
}

// ── Edge detail ──────────────────────────────────────────────────

/// The Source/Target blocks of the edge inspector.
#[derive(Debug, Serialize, Deserialize)]
pub struct EdgeEndpoint {
    pub asset_id: String,
    pub asset_name: String,
    pub asset_description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EdgeConnection {
    pub protocol: String,
    pub port: String,
    pub rank: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EdgeDetailResponse {
    pub source: EdgeEndpoint,
    pub target: EdgeEndpoint,
    pub connections: Vec<EdgeConnection>,
    pub total: usize,
}

fn endpoint(assembly: &GraphAssembly, asset_id: &str, description: Option<&str>) -> EdgeEndpoint {
    EdgeEndpoint {
        asset_id: asset_id.to_string(),
        asset_name: assembly
            .node(asset_id)
            .map(|n| n.asset_name.clone())
            .unwrap_or_default(),
        asset_description: description.unwrap_or_default().to_string(),
    }
}

/// Build the edge inspector payload from the assembled pair rows.
pub fn build_edge_detail(
    assembly: &GraphAssembly,
    source: (&str, Option<&str>),
    target: (&str, Option<&str>),
    connections: Vec<ConnectionEdge>,
) -> EdgeDetailResponse {
    let connections: Vec<EdgeConnection> = connections
        .into_iter()
        .map(|c| EdgeConnection {
            protocol: c.protocol,
            port: c.port,
            rank: c.rank,
        })
        .collect();

    EdgeDetailResponse {
        source: endpoint(assembly, source.0, source.1),
        target: endpoint(assembly, target.0, target.1),
        total: connections.len(),
        connections,
    }
}
