//! Neo4j connection management and the pooled session implementation.

use std::sync::Arc;

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query, Row};
use serde::Deserialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::store::{GraphStore, ParamValue, RawRow, Statement, StoreSession};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Failed to select namespace {namespace}: {reason}")]
    Namespace { namespace: String, reason: String },

    #[error("Neo4j query error: {0}")]
    Query(String),
}

impl From<neo4rs::Error> for GraphError {
    fn from(e: neo4rs::Error) -> Self {
        Self::Query(e.to_string())
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
    /// Neo4j database every session is bound to.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

impl GraphConfig {
    pub fn uri(&self) -> String {
        format!("bolt://{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    7687
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "assetviz-dev".to_string()
}

fn default_namespace() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: default_password(),
            namespace: default_namespace(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Sessions are bounded by a semaphore sized to `max_connections`; each
/// session holds one permit until it is dropped. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    sessions: Arc<Semaphore>,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let uri = config.uri();
        let neo_config = ConfigBuilder::default()
            .uri(uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %uri, namespace = %config.namespace, "Connected to Neo4j");
        Ok(Self {
            graph,
            sessions: Arc::new(Semaphore::new(config.max_connections.max(1) as usize)),
        })
    }

    /// Execute a write-only query against `namespace`.
    pub async fn run_on(&self, namespace: &str, query: Query) -> Result<(), GraphError> {
        self.graph.run_on(namespace, query).await?;
        Ok(())
    }

    /// Begin a transaction against `namespace`.
    pub async fn start_txn_on(&self, namespace: &str) -> Result<neo4rs::Txn, GraphError> {
        Ok(self.graph.start_txn_on(namespace).await?)
    }
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn acquire(&self) -> Result<Box<dyn StoreSession>, GraphError> {
        let permit = Arc::clone(&self.sessions)
            .acquire_owned()
            .await
            .map_err(|e| GraphError::Connection(format!("session pool closed: {e}")))?;
        tracing::trace!(
            available = self.sessions.available_permits(),
            "Acquired graph session"
        );
        Ok(Box::new(Neo4jSession {
            graph: self.graph.clone(),
            namespace: None,
            _permit: permit,
        }))
    }
}

/// A pooled session bound to one Neo4j database.
struct Neo4jSession {
    graph: Graph,
    namespace: Option<String>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for Neo4jSession {
    fn drop(&mut self) {
        tracing::trace!(namespace = ?self.namespace, "Released graph session");
    }
}

#[async_trait]
impl StoreSession for Neo4jSession {
    async fn select_namespace(&mut self, namespace: &str) -> Result<(), GraphError> {
        let probe = query("RETURN 1 AS ok");
        let mut stream = self
            .graph
            .execute_on(namespace, probe)
            .await
            .map_err(|e| namespace_error(namespace, e))?;
        stream
            .next()
            .await
            .map_err(|e| namespace_error(namespace, e))?;
        self.namespace = Some(namespace.to_string());
        Ok(())
    }

    async fn run(&mut self, statement: &Statement) -> Result<Vec<RawRow>, GraphError> {
        let namespace = self.namespace.as_deref().ok_or_else(|| GraphError::Namespace {
            namespace: String::new(),
            reason: "no namespace selected for session".to_string(),
        })?;

        let mut q = query(statement.template.text());
        for (key, value) in statement.params.iter() {
            q = match value {
                ParamValue::Str(s) => q.param(key, s.clone()),
                ParamValue::Int(n) => q.param(key, *n),
            };
        }

        let columns = statement.template.columns();
        let mut stream = self.graph.execute_on(namespace, q).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row_cells(&row, columns));
        }
        Ok(rows)
    }
}

/// Pick `columns` out of a driver row in order. Missing or undecodable
/// columns become null cells.
fn row_cells(row: &Row, columns: &[&str]) -> RawRow {
    columns
        .iter()
        .map(|col| {
            row.get::<serde_json::Value>(col)
                .unwrap_or(serde_json::Value::Null)
        })
        .collect::<Vec<_>>()
        .into()
}

fn namespace_error(namespace: &str, e: neo4rs::Error) -> GraphError {
    GraphError::Namespace {
        namespace: namespace.to_string(),
        reason: e.to_string(),
    }
}
