//! Application state shared across handlers.

use assetviz_graph::QueryExecutor;

/// Shared application state. The executor's session pool is the only
/// resource handlers share.
#[derive(Clone)]
pub struct AppState {
    pub executor: QueryExecutor,
}

impl AppState {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }
}
