//! The seam between the executor and a concrete graph store.
//!
//! A [`GraphStore`] hands out sessions; a [`StoreSession`] is bound to one
//! namespace and runs statements. Implementations release whatever a session
//! holds in `Drop`, so a session is returned to the pool on every exit path.

use async_trait::async_trait;

use crate::client::GraphError;
use crate::templates::QueryTemplate;

/// A single raw result cell, as produced by the store.
pub type Cell = serde_json::Value;

/// One result row, with cells in the template's declared column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// The cell at `index`, or `None` if the row is shorter than that.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<Vec<Cell>> for RawRow {
    fn from(cells: Vec<Cell>) -> Self {
        Self::new(cells)
    }
}

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

/// Named parameters bound into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(&'static str, ParamValue)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_str(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.push((key, ParamValue::Str(value.into())));
        self
    }

    pub fn with_int(mut self, key: &'static str, value: i64) -> Self {
        self.0.push((key, ParamValue::Int(value)));
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

/// A template plus its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub template: QueryTemplate,
    pub params: Params,
}

/// A source of namespace-scoped sessions. Safe for concurrent use.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Wait for a free session from the pool.
    async fn acquire(&self) -> Result<Box<dyn StoreSession>, GraphError>;
}

/// A pooled session. Dropping it releases it.
#[async_trait]
pub trait StoreSession: Send {
    /// Bind the session to `namespace`. Called once, right after acquisition.
    async fn select_namespace(&mut self, namespace: &str) -> Result<(), GraphError>;

    /// Run one statement and collect every row.
    async fn run(&mut self, statement: &Statement) -> Result<Vec<RawRow>, GraphError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_row_out_of_range_cell() {
        let row = RawRow::new(vec![json!("A00001"), json!(null)]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.cell(0), Some(&json!("A00001")));
        assert_eq!(row.cell(1), Some(&json!(null)));
        assert!(row.cell(2).is_none());
    }

    #[test]
    fn test_params_lookup() {
        let params = Params::new()
            .with_str("asset_id", "A00001")
            .with_int("limit", 300);
        assert_eq!(
            params.get("asset_id"),
            Some(&ParamValue::Str("A00001".to_string()))
        );
        assert_eq!(params.get("limit"), Some(&ParamValue::Int(300)));
        assert!(params.get("missing").is_none());
        assert_eq!(params.iter().count(), 2);
    }
}
