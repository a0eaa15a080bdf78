//! assetviz-core: Shared types, identifier validation, and error handling for assetviz.
//!
//! This crate provides the foundational types used by the graph and API layers:
//! - Asset nodes and ranked connection edges of the infrastructure graph
//! - Neighbor, asset-type, and asset-detail records
//! - The asset identifier validator, the only gate in front of every query
//! - Common error types

pub mod error;
pub mod types;
pub mod validate;

pub use error::ValidationError;
pub use types::{
    AssetDetailRecord, AssetNode, AssetTypeRecord, ConnectionEdge, ConnectivityRow, Direction,
    EdgeKey, NeighborRecord, PairKey,
};
pub use validate::AssetId;
