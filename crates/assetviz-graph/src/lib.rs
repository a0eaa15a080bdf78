//! assetviz-graph: read access to the asset graph.
//!
//! Every query against the graph store flows through [`QueryExecutor`], which
//! scopes a pooled session to the configured namespace for exactly one
//! statement. Rows come back as [`RawRow`]s and are decoded null-safely by
//! [`decode`], then either mapped to typed records or assembled into a
//! [`DisplayGraph`].

pub mod assemble;
pub mod client;
pub mod decode;
pub mod executor;
pub mod load;
pub mod queries;
pub mod store;
pub mod templates;

pub use assemble::{assemble, DisplayEdge, DisplayGraph, GraphAssembly};
pub use client::{GraphClient, GraphConfig, GraphError};
pub use executor::QueryExecutor;
pub use queries::PairConnections;
pub use store::{GraphStore, ParamValue, Params, RawRow, Statement, StoreSession};
pub use templates::{Dialect, QueryTemplate};
