//! Scoped execution of query templates.

use std::sync::Arc;

use crate::client::GraphError;
use crate::store::{GraphStore, Params, RawRow, Statement};
use crate::templates::QueryTemplate;

/// Runs one template per session against a fixed namespace.
///
/// A session is acquired, bound to the namespace, used for exactly one
/// statement, and dropped on every exit path. Failures are returned as-is;
/// nothing is retried.
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn GraphStore>,
    namespace: String,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn GraphStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Execute `template` with `params` and return the raw rows.
    pub async fn execute(
        &self,
        template: QueryTemplate,
        params: Params,
    ) -> Result<Vec<RawRow>, GraphError> {
        let mut session = self.store.acquire().await?;
        session.select_namespace(&self.namespace).await?;

        let statement = Statement { template, params };
        let rows = session.run(&statement).await.map_err(|e| {
            tracing::error!(template = template.name(), error = %e, "Query failed");
            e
        })?;

        tracing::debug!(
            template = template.name(),
            dialect = ?template.dialect(),
            rows = rows.len(),
            "Query executed"
        );
        Ok(rows)
    }

    /// Acquire a session and select the namespace without running anything.
    pub async fn check(&self) -> Result<(), GraphError> {
        let mut session = self.store.acquire().await?;
        session.select_namespace(&self.namespace).await
    }
}
