//! Bulk loading of assets and ranked connections.
//!
//! Writes use MERGE (upsert) semantics. Assets are keyed by `asset_id`;
//! connects-to edges are keyed by (source, target, rank), so ranks must be
//! assigned deterministically before anything is written.

use std::collections::HashMap;

use neo4rs::query;
use serde::Deserialize;

use assetviz_core::types::{DEFAULT_PRIORITY, DEFAULT_PROTOCOL, DEFAULT_TTB};
use assetviz_core::validate::validate;
use assetviz_core::{AssetDetailRecord, AssetTypeRecord, ConnectionEdge, PairKey, ValidationError};

use crate::client::{GraphClient, GraphError};

/// An unranked connection as it appears in source data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionSpec {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub port: String,
}

// ── Seed Documents ───────────────────────────────────────────────

/// A seed document: asset types, assets, and unranked connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub asset_types: Vec<AssetTypeRecord>,
    #[serde(default)]
    pub assets: Vec<SeedAsset>,
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
}

/// An asset as written in a seed document. Type and segment are references
/// that become relationships, not properties.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedAsset {
    pub asset_id: String,
    #[serde(default)]
    pub asset_name: String,
    #[serde(default)]
    pub asset_description: Option<String>,
    #[serde(default)]
    pub asset_note: Option<String>,
    #[serde(default)]
    pub type_id: Option<String>,
    #[serde(default)]
    pub segment: Option<SeedSegment>,
    #[serde(default)]
    pub is_entrance: bool,
    #[serde(default)]
    pub is_target: bool,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub has_vulnerability: bool,
    #[serde(default = "default_ttb")]
    pub ttb: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedSegment {
    pub segment_id: String,
    pub segment_name: String,
}

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

fn default_ttb() -> i64 {
    DEFAULT_TTB
}

impl SeedAsset {
    /// The node properties to upsert.
    pub fn record(&self) -> AssetDetailRecord {
        AssetDetailRecord {
            asset_id: self.asset_id.clone(),
            asset_name: self.asset_name.clone(),
            asset_description: self.asset_description.clone(),
            asset_note: self.asset_note.clone(),
            asset_type: None,
            segment_name: None,
            is_entrance: self.is_entrance,
            is_target: self.is_target,
            priority: self.priority,
            has_vulnerability: self.has_vulnerability,
            ttb: self.ttb,
        }
    }
}

impl SeedFile {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Every asset id and connection endpoint must be a valid asset identifier,
    /// otherwise the API could never look it up.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for asset in &self.assets {
            validate(&asset.asset_id)?;
        }
        for conn in &self.connections {
            validate(&conn.source)?;
            validate(&conn.target)?;
        }
        Ok(())
    }

    pub fn ranked_connections(&self) -> Vec<ConnectionEdge> {
        assign_ranks(&self.connections)
    }
}

/// Counts written by [`GraphClient::load_seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub asset_types: usize,
    pub assets: usize,
    pub connections: usize,
}

/// Assign ranks per ordered pair in input order: 0, 1, 2, …
pub fn assign_ranks(specs: &[ConnectionSpec]) -> Vec<ConnectionEdge> {
    let mut next_rank: HashMap<PairKey, u32> = HashMap::new();
    specs
        .iter()
        .map(|conn| {
            let counter = next_rank
                .entry(PairKey::new(conn.source.clone(), conn.target.clone()))
                .or_insert(0);
            let rank = *counter;
            *counter += 1;
            ConnectionEdge {
                source: conn.source.clone(),
                target: conn.target.clone(),
                rank,
                protocol: conn
                    .protocol
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
                port: conn.port.clone(),
            }
        })
        .collect()
}

impl GraphClient {
    // ── Node Upserts ─────────────────────────────────────────────

    /// Upsert an Asset node with every stored attribute.
    pub async fn upsert_asset(
        &self,
        namespace: &str,
        asset: &AssetDetailRecord,
    ) -> Result<(), GraphError> {
        let q = query(
            "MERGE (a:Asset {asset_id: $asset_id})
             SET a.asset_name = $asset_name,
                 a.asset_description = $asset_description,
                 a.asset_note = $asset_note,
                 a.is_entrance = $is_entrance,
                 a.is_target = $is_target,
                 a.priority = $priority,
                 a.has_vulnerability = $has_vulnerability,
                 a.ttb = $ttb",
        )
        .param("asset_id", asset.asset_id.clone())
        .param("asset_name", asset.asset_name.clone())
        .param("asset_description", asset.asset_description.clone())
        .param("asset_note", asset.asset_note.clone())
        .param("is_entrance", asset.is_entrance)
        .param("is_target", asset.is_target)
        .param("priority", asset.priority)
        .param("has_vulnerability", asset.has_vulnerability)
        .param("ttb", asset.ttb);

        self.run_on(namespace, q).await
    }

    /// Upsert an AssetType node.
    pub async fn upsert_asset_type(
        &self,
        namespace: &str,
        asset_type: &AssetTypeRecord,
    ) -> Result<(), GraphError> {
        let q = query(
            "MERGE (t:AssetType {type_id: $type_id})
             SET t.type_name = $type_name",
        )
        .param("type_id", asset_type.type_id.clone())
        .param("type_name", asset_type.type_name.clone());

        self.run_on(namespace, q).await
    }

    // ── Edge Upserts ─────────────────────────────────────────────

    /// Link an asset to its type, replacing any previous type link.
    pub async fn set_asset_type(
        &self,
        namespace: &str,
        asset_id: &str,
        type_id: &str,
    ) -> Result<(), GraphError> {
        let q = query(
            "MATCH (a:Asset {asset_id: $asset_id})
             MATCH (t:AssetType {type_id: $type_id})
             OPTIONAL MATCH (a)-[old:HAS_TYPE]->(:AssetType)
             DELETE old
             MERGE (a)-[:HAS_TYPE]->(t)",
        )
        .param("asset_id", asset_id.to_string())
        .param("type_id", type_id.to_string());

        self.run_on(namespace, q).await
    }

    /// Place an asset in a network segment, creating the segment if needed.
    pub async fn set_asset_segment(
        &self,
        namespace: &str,
        asset_id: &str,
        segment_id: &str,
        segment_name: &str,
    ) -> Result<(), GraphError> {
        let q = query(
            "MATCH (a:Asset {asset_id: $asset_id})
             MERGE (s:NetworkSegment {segment_id: $segment_id})
             SET s.segment_name = $segment_name
             MERGE (a)-[:BELONGS_TO]->(s)",
        )
        .param("asset_id", asset_id.to_string())
        .param("segment_id", segment_id.to_string())
        .param("segment_name", segment_name.to_string());

        self.run_on(namespace, q).await
    }

    /// Upsert ranked connections in a single transaction.
    ///
    /// Returns the number of edges written.
    pub async fn load_connections(
        &self,
        namespace: &str,
        edges: &[ConnectionEdge],
    ) -> Result<usize, GraphError> {
        let mut txn = self.start_txn_on(namespace).await?;

        for edge in edges {
            let q = query(
                "MATCH (a:Asset {asset_id: $source})
                 MATCH (b:Asset {asset_id: $target})
                 MERGE (a)-[e:CONNECTS_TO {rank: $rank}]->(b)
                 SET e.connection_protocol = $protocol,
                     e.connection_port = $port",
            )
            .param("source", edge.source.clone())
            .param("target", edge.target.clone())
            .param("rank", i64::from(edge.rank))
            .param("protocol", edge.protocol.clone())
            .param("port", edge.port.clone());

            txn.run(q).await?;
        }

        txn.commit().await?;
        tracing::info!(namespace, edges = edges.len(), "Loaded connections");
        Ok(edges.len())
    }

    // ── Seeding ──────────────────────────────────────────────────

    /// Write a whole seed document: types first, then assets with their type
    /// and segment links, then ranked connections.
    pub async fn load_seed(
        &self,
        namespace: &str,
        seed: &SeedFile,
    ) -> Result<SeedSummary, GraphError> {
        for asset_type in &seed.asset_types {
            self.upsert_asset_type(namespace, asset_type).await?;
        }

        for asset in &seed.assets {
            self.upsert_asset(namespace, &asset.record()).await?;
            if let Some(type_id) = &asset.type_id {
                self.set_asset_type(namespace, &asset.asset_id, type_id).await?;
            }
            if let Some(segment) = &asset.segment {
                self.set_asset_segment(
                    namespace,
                    &asset.asset_id,
                    &segment.segment_id,
                    &segment.segment_name,
                )
                .await?;
            }
        }

        let connections = self
            .load_connections(namespace, &seed.ranked_connections())
            .await?;

        let summary = SeedSummary {
            asset_types: seed.asset_types.len(),
            assets: seed.assets.len(),
            connections,
        };
        tracing::info!(
            namespace,
            asset_types = summary.asset_types,
            assets = summary.assets,
            connections = summary.connections,
            "Seed loaded"
        );
        Ok(summary)
    }
}
