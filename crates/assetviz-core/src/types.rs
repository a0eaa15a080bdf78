//! Core domain types for the asset graph.
//!
//! All of these are value records rebuilt from the graph store on every
//! request. The store is the single source of truth; nothing here is cached.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Priority assumed when an asset carries none. Lower is more critical.
pub const DEFAULT_PRIORITY: i64 = 4;

/// Time-to-bypass assumed when an asset carries none.
pub const DEFAULT_TTB: i64 = 10;

/// Protocol assumed when a connection carries none.
pub const DEFAULT_PROTOCOL: &str = "TCP";

// ── Assets ────────────────────────────────────────────────────────

/// A host or device in the infrastructure graph.
///
/// Identity is `asset_id` alone: two records with the same identifier are the
/// same asset regardless of which row produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetNode {
    pub asset_id: String,
    pub asset_name: String,
    pub asset_type: Option<String>,
    pub is_entrance: bool,
    pub is_target: bool,
    pub priority: i64,
    pub has_vulnerability: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttb: Option<i64>,
}

impl AssetNode {
    /// An asset with only its identifier known and every attribute defaulted.
    pub fn bare(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            asset_name: String::new(),
            asset_type: None,
            is_entrance: false,
            is_target: false,
            priority: DEFAULT_PRIORITY,
            has_vulnerability: false,
            ttb: None,
        }
    }

    /// The name to show for this asset, falling back to its identifier.
    pub fn display_label(&self) -> &str {
        if self.asset_name.is_empty() {
            &self.asset_id
        } else {
            &self.asset_name
        }
    }
}

/// Everything the inspector shows for a single asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDetailRecord {
    pub asset_id: String,
    pub asset_name: String,
    pub asset_description: Option<String>,
    pub asset_note: Option<String>,
    pub asset_type: Option<String>,
    pub segment_name: Option<String>,
    pub is_entrance: bool,
    pub is_target: bool,
    pub priority: i64,
    pub has_vulnerability: bool,
    pub ttb: i64,
}

/// A distinct asset type, enumerated independently of any asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTypeRecord {
    pub type_id: String,
    pub type_name: String,
}

// ── Connections ───────────────────────────────────────────────────

/// The true identity of a stored connects-to edge.
///
/// Parallel connections between the same ordered pair differ only by rank;
/// writing two edges with the same key overwrites one with the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: String,
    pub target: String,
    pub rank: u32,
}

impl EdgeKey {
    pub fn pair(&self) -> PairKey {
        PairKey {
            source: self.source.clone(),
            target: self.target.clone(),
        }
    }
}

/// An ordered (source, target) pair with rank ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub source: String,
    pub target: String,
}

impl PairKey {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// A single ranked connects-to edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEdge {
    pub source: String,
    pub target: String,
    pub rank: u32,
    pub protocol: String,
    pub port: String,
}

impl ConnectionEdge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source.clone(),
            target: self.target.clone(),
            rank: self.rank,
        }
    }
}

/// One row of the enriched connectivity scan: both endpoints plus the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityRow {
    pub source: AssetNode,
    pub target: AssetNode,
    pub connection: ConnectionEdge,
}

// ── Neighbors ─────────────────────────────────────────────────────

/// Direction of a connects-to hop relative to the asset being inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outbound" => Ok(Self::Outbound),
            "inbound" => Ok(Self::Inbound),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// An asset one connects-to hop away, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRecord {
    pub neighbor_id: String,
    pub direction: Direction,
}
