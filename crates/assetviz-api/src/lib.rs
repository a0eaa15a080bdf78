//! assetviz-api: HTTP surface over the asset graph.
//!
//! Handlers validate identifiers, call the query executor, and hand decoded
//! records to the response builders in [`responses`]. Builders are pure; all
//! I/O stays in [`routes`].

pub mod config;
pub mod error;
pub mod responses;
pub mod routes;
pub mod seed;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{router, run, StartupError};
pub use state::AppState;
