//! Display-graph assembly from connectivity rows.
//!
//! The same rows feed two views: a deduplicated graph for rendering (one node
//! per asset id, one edge per ordered pair) and the full ranked connection
//! list for any pair. Both are read off a single [`GraphAssembly`], so the
//! edge count shown for a pair always equals the connections listed for it.

use std::collections::{BTreeMap, HashMap};

use assetviz_core::{AssetNode, ConnectionEdge, ConnectivityRow, EdgeKey, PairKey};

/// One rendered edge, standing in for every ranked connection of its pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEdge {
    pub source: String,
    pub target: String,
    pub connection_count: usize,
}

/// Deduplicated nodes and edges, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayGraph {
    pub nodes: Vec<AssetNode>,
    pub edges: Vec<DisplayEdge>,
}

/// Nodes and ranked connections indexed from a batch of connectivity rows.
#[derive(Debug, Clone, Default)]
pub struct GraphAssembly {
    nodes: Vec<AssetNode>,
    node_index: HashMap<String, usize>,
    connections: BTreeMap<EdgeKey, ConnectionEdge>,
    pair_order: Vec<PairKey>,
}

impl GraphAssembly {
    pub fn from_rows(rows: &[ConnectivityRow]) -> Self {
        let mut assembly = Self::default();
        for row in rows {
            assembly.add_row(row);
        }
        assembly
    }

    fn add_row(&mut self, row: &ConnectivityRow) {
        self.register_node(&row.source);
        self.register_node(&row.target);

        let edge = &row.connection;
        if edge.source.is_empty() || edge.target.is_empty() {
            tracing::warn!(
                source = %edge.source,
                target = %edge.target,
                "Skipping connection with missing endpoint id"
            );
            return;
        }

        let key = edge.key();
        if self.connections.contains_key(&key) {
            return;
        }
        let pair = key.pair();
        if !self.has_pair(&pair) {
            self.pair_order.push(pair);
        }
        self.connections.insert(key, edge.clone());
    }

    /// First registration for an id wins; later rows never overwrite it.
    fn register_node(&mut self, node: &AssetNode) {
        if node.asset_id.is_empty() || self.node_index.contains_key(&node.asset_id) {
            return;
        }
        self.node_index
            .insert(node.asset_id.clone(), self.nodes.len());
        self.nodes.push(node.clone());
    }

    fn has_pair(&self, pair: &PairKey) -> bool {
        self.pair_range(&pair.source, &pair.target).next().is_some()
    }

    fn pair_range<'a>(
        &'a self,
        source: &str,
        target: &str,
    ) -> impl Iterator<Item = &'a ConnectionEdge> + 'a {
        let lo = EdgeKey {
            source: source.to_string(),
            target: target.to_string(),
            rank: 0,
        };
        let hi = EdgeKey {
            rank: u32::MAX,
            ..lo.clone()
        };
        self.connections.range(lo..=hi).map(|(_, edge)| edge)
    }

    pub fn node(&self, asset_id: &str) -> Option<&AssetNode> {
        self.node_index.get(asset_id).map(|&i| &self.nodes[i])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct (source, target, rank) connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Every ranked connection from `source` to `target`, in rank order.
    pub fn connections_between(&self, source: &str, target: &str) -> Vec<ConnectionEdge> {
        self.pair_range(source, target).cloned().collect()
    }

    /// At most one edge per ordered pair, all ranks collapsed.
    pub fn display_graph(&self) -> DisplayGraph {
        let edges = self
            .pair_order
            .iter()
            .map(|pair| DisplayEdge {
                source: pair.source.clone(),
                target: pair.target.clone(),
                connection_count: self.pair_range(&pair.source, &pair.target).count(),
            })
            .collect();

        DisplayGraph {
            nodes: self.nodes.clone(),
            edges,
        }
    }
}

/// Assemble the display graph for `rows`.
pub fn assemble(rows: &[ConnectivityRow]) -> DisplayGraph {
    GraphAssembly::from_rows(rows).display_graph()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn node(id: &str, name: &str) -> AssetNode {
        AssetNode {
            asset_name: name.to_string(),
            ..AssetNode::bare(id)
        }
    }

    fn row(src: &str, dst: &str, rank: u32, protocol: &str, port: &str) -> ConnectivityRow {
        ConnectivityRow {
            source: node(src, ""),
            target: node(dst, ""),
            connection: ConnectionEdge {
                source: src.to_string(),
                target: dst.to_string(),
                rank,
                protocol: protocol.to_string(),
                port: port.to_string(),
            },
        }
    }

    #[test]
    fn test_parallel_connections_collapse_for_display() {
        let rows = vec![
            row("A00001", "A00002", 0, "TCP", "443"),
            row("A00001", "A00002", 1, "UDP", "1194"),
        ];
        let assembly = GraphAssembly::from_rows(&rows);
        let graph = assembly.display_graph();

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.asset_id.as_str()).collect();
        assert_eq!(ids, vec!["A00001", "A00002"]);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].connection_count, 2);

        let conns = assembly.connections_between("A00001", "A00002");
        assert_eq!(conns.len(), 2);
        assert_eq!((conns[0].protocol.as_str(), conns[0].port.as_str()), ("TCP", "443"));
        assert_eq!((conns[1].protocol.as_str(), conns[1].port.as_str()), ("UDP", "1194"));
    }

    #[test]
    fn test_node_count_equals_distinct_ids() {
        let rows = vec![
            row("A00001", "A00002", 0, "TCP", "22"),
            row("A00002", "A00003", 0, "TCP", "22"),
            row("A00003", "A00001", 0, "TCP", "22"),
            row("A00004", "A00001", 0, "TCP", "80"),
        ];
        let distinct: HashSet<&str> = rows
            .iter()
            .flat_map(|r| [r.source.asset_id.as_str(), r.target.asset_id.as_str()])
            .collect();
        let graph = assemble(&rows);
        assert_eq!(graph.nodes.len(), distinct.len());
        assert_eq!(graph.edges.len(), 4);
    }

    #[test]
    fn test_first_seen_node_wins() {
        let mut first = row("A00001", "A00002", 0, "TCP", "22");
        first.source = node("A00001", "first");
        let mut second = row("A00001", "A00003", 0, "TCP", "22");
        second.source = AssetNode {
            priority: 1,
            asset_type: Some("Server".to_string()),
            ..node("A00001", "richer")
        };

        let assembly = GraphAssembly::from_rows(&[first, second]);
        let kept = assembly.node("A00001").unwrap();
        assert_eq!(kept.asset_name, "first");
        assert_eq!(kept.priority, 4);
        assert!(kept.asset_type.is_none());
    }

    #[test]
    fn test_direction_matters_for_pairs() {
        let rows = vec![
            row("A00001", "A00002", 0, "TCP", "22"),
            row("A00002", "A00001", 0, "TCP", "22"),
        ];
        let assembly = GraphAssembly::from_rows(&rows);
        assert_eq!(assembly.display_graph().edges.len(), 2);
        assert_eq!(assembly.connections_between("A00001", "A00002").len(), 1);
        assert_eq!(assembly.connections_between("A00002", "A00001").len(), 1);
    }

    #[test]
    fn test_duplicate_rank_rows_count_once() {
        // Multiple HAS_TYPE matches repeat the same stored edge.
        let rows = vec![
            row("A00001", "A00002", 0, "TCP", "443"),
            row("A00001", "A00002", 0, "UDP", "53"),
            row("A00001", "A00002", 2, "TCP", "8443"),
        ];
        let assembly = GraphAssembly::from_rows(&rows);
        let conns = assembly.connections_between("A00001", "A00002");
        assert_eq!(conns.iter().map(|c| c.rank).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(conns[0].protocol, "TCP");
        assert_eq!(assembly.display_graph().edges[0].connection_count, 2);
        assert_eq!(assembly.connection_count(), 2);
    }

    #[test]
    fn test_connections_sorted_by_rank_regardless_of_row_order() {
        let rows = vec![
            row("A00001", "A00002", 2, "TCP", "3"),
            row("A00001", "A00002", 0, "TCP", "1"),
            row("A00001", "A00002", 1, "TCP", "2"),
        ];
        let conns = GraphAssembly::from_rows(&rows).connections_between("A00001", "A00002");
        let ports: Vec<&str> = conns.iter().map(|c| c.port.as_str()).collect();
        assert_eq!(ports, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_missing_endpoint_ids_are_skipped() {
        let rows = vec![row("A00001", "", 0, "TCP", "22")];
        let graph = assemble(&rows);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_unknown_pair_is_empty() {
        let assembly = GraphAssembly::from_rows(&[row("A00001", "A00002", 0, "TCP", "22")]);
        assert!(assembly.connections_between("A00009", "A00001").is_empty());
        assert!(assemble(&[]).nodes.is_empty());
    }
}
