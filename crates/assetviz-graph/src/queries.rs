//! Typed read operations over the query executor.
//!
//! Identifiers arrive as [`AssetId`], so nothing reaches a template without
//! having passed validation first.

use assetviz_core::{
    AssetDetailRecord, AssetId, AssetNode, AssetTypeRecord, ConnectivityRow, NeighborRecord,
};

use crate::client::GraphError;
use crate::decode;
use crate::executor::QueryExecutor;
use crate::store::Params;
use crate::templates::{connectivity, QueryTemplate, CONNECTIVITY_ROW_CAP};

/// Rows for one ordered pair, plus the endpoint descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairConnections {
    pub rows: Vec<ConnectivityRow>,
    pub source_description: Option<String>,
    pub target_description: Option<String>,
}

impl QueryExecutor {
    // ── Graph ────────────────────────────────────────────────────

    /// The enriched connectivity scan, capped at [`CONNECTIVITY_ROW_CAP`] rows.
    pub async fn fetch_connectivity(&self) -> Result<Vec<ConnectivityRow>, GraphError> {
        let rows = self
            .execute(
                QueryTemplate::ConnectivityScan,
                Params::new().with_int("limit", CONNECTIVITY_ROW_CAP),
            )
            .await?;
        if rows.len() as i64 >= CONNECTIVITY_ROW_CAP {
            tracing::warn!(cap = CONNECTIVITY_ROW_CAP, "Connectivity scan hit row cap");
        }
        Ok(rows.iter().map(decode::connectivity_row).collect())
    }

    /// Every ranked connection from `source` to `target`, in rank order.
    pub async fn fetch_connections_between(
        &self,
        source: &AssetId,
        target: &AssetId,
    ) -> Result<PairConnections, GraphError> {
        let rows = self
            .execute(
                QueryTemplate::ConnectionsBetween,
                Params::new()
                    .with_str("source_id", source.as_str())
                    .with_str("target_id", target.as_str()),
            )
            .await?;

        let (source_description, target_description) = match rows.first() {
            Some(first) => (
                decode::decode_opt_string(first, connectivity::SOURCE_DESCRIPTION),
                decode::decode_opt_string(first, connectivity::TARGET_DESCRIPTION),
            ),
            None => (None, None),
        };

        Ok(PairConnections {
            rows: rows.iter().map(decode::connectivity_row).collect(),
            source_description,
            target_description,
        })
    }

    // ── Assets ───────────────────────────────────────────────────

    /// Every asset with its type name, ordered by id.
    pub async fn fetch_assets(&self) -> Result<Vec<AssetNode>, GraphError> {
        let rows = self
            .execute(QueryTemplate::AssetList, Params::new())
            .await?;
        Ok(rows
            .iter()
            .map(|row| decode::asset_at(row, 0))
            .filter(|asset| !asset.asset_id.is_empty())
            .collect())
    }

    /// Full detail for one asset, or `None` if the store has no such asset.
    pub async fn fetch_asset_detail(
        &self,
        id: &AssetId,
    ) -> Result<Option<AssetDetailRecord>, GraphError> {
        let rows = self
            .execute(
                QueryTemplate::AssetDetail,
                Params::new().with_str("asset_id", id.as_str()),
            )
            .await?;
        Ok(rows.first().map(decode::asset_detail))
    }

    // ── Neighbors & Types ────────────────────────────────────────

    /// Assets one connects-to hop away in either direction.
    pub async fn fetch_neighbors(&self, id: &AssetId) -> Result<Vec<NeighborRecord>, GraphError> {
        let rows = self
            .execute(
                QueryTemplate::Neighbors,
                Params::new().with_str("asset_id", id.as_str()),
            )
            .await?;

        let mut neighbors = Vec::with_capacity(rows.len());
        for row in &rows {
            match decode::neighbor(row) {
                Some(n) => neighbors.push(n),
                None => tracing::warn!(asset_id = %id, "Skipping malformed neighbor row"),
            }
        }
        Ok(neighbors)
    }

    pub async fn fetch_asset_types(&self) -> Result<Vec<AssetTypeRecord>, GraphError> {
        let rows = self
            .execute(QueryTemplate::AssetTypes, Params::new())
            .await?;
        Ok(rows.iter().map(decode::asset_type).collect())
    }
}
