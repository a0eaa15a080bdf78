//! Cypher templates for every supported retrieval.
//!
//! Each template declares its column list; the decoder addresses cells by
//! index into that list. Identifiers are always bound as `$` parameters.

/// Upper bound on rows returned by the connectivity scan.
pub const CONNECTIVITY_ROW_CAP: i64 = 300;

/// How a template was authored. Carried as metadata only; it does not change
/// the row contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Multi-hop `OPTIONAL MATCH` joins across related nodes.
    Pattern,
    /// Single directed hops, `UNION` of forward/backward hops, `DISTINCT` enumeration.
    Traversal,
}

/// The retrieval operations the executor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTemplate {
    /// Every connects-to edge with both endpoints' attributes and type names.
    ConnectivityScan,
    /// Every asset with its type name.
    AssetList,
    /// One asset with its type and segment. Param: `asset_id`.
    AssetDetail,
    /// Outbound and inbound connects-to neighbors. Param: `asset_id`.
    Neighbors,
    /// Distinct asset types.
    AssetTypes,
    /// Every ranked connection for one ordered pair. Params: `source_id`, `target_id`.
    ConnectionsBetween,
}

/// Column offsets within one asset block of a row.
pub mod asset {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const IS_ENTRANCE: usize = 2;
    pub const IS_TARGET: usize = 3;
    pub const PRIORITY: usize = 4;
    pub const HAS_VULNERABILITY: usize = 5;
    pub const TYPE: usize = 6;
    pub const WIDTH: usize = 7;
}

/// Column indices of connectivity rows (scan and per-pair).
pub mod connectivity {
    pub const SOURCE: usize = 0;
    pub const TARGET: usize = super::asset::WIDTH;
    pub const RANK: usize = 2 * super::asset::WIDTH;
    pub const PROTOCOL: usize = RANK + 1;
    pub const PORT: usize = RANK + 2;
    pub const SOURCE_DESCRIPTION: usize = RANK + 3;
    pub const TARGET_DESCRIPTION: usize = RANK + 4;
}

/// Column indices of the asset detail row.
pub mod detail {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const DESCRIPTION: usize = 2;
    pub const NOTE: usize = 3;
    pub const IS_ENTRANCE: usize = 4;
    pub const IS_TARGET: usize = 5;
    pub const PRIORITY: usize = 6;
    pub const HAS_VULNERABILITY: usize = 7;
    pub const TTB: usize = 8;
    pub const TYPE: usize = 9;
    pub const SEGMENT: usize = 10;
}

const CONNECTIVITY_COLUMNS: &[&str] = &[
    "src_asset_id",
    "src_asset_name",
    "src_is_entrance",
    "src_is_target",
    "src_priority",
    "src_has_vulnerability",
    "src_asset_type",
    "dst_asset_id",
    "dst_asset_name",
    "dst_is_entrance",
    "dst_is_target",
    "dst_priority",
    "dst_has_vulnerability",
    "dst_asset_type",
    "rank",
    "connection_protocol",
    "connection_port",
];

const PAIR_COLUMNS: &[&str] = &[
    "src_asset_id",
    "src_asset_name",
    "src_is_entrance",
    "src_is_target",
    "src_priority",
    "src_has_vulnerability",
    "src_asset_type",
    "dst_asset_id",
    "dst_asset_name",
    "dst_is_entrance",
    "dst_is_target",
    "dst_priority",
    "dst_has_vulnerability",
    "dst_asset_type",
    "rank",
    "connection_protocol",
    "connection_port",
    "src_asset_description",
    "dst_asset_description",
];

const ASSET_LIST_COLUMNS: &[&str] = &[
    "asset_id",
    "asset_name",
    "is_entrance",
    "is_target",
    "priority",
    "has_vulnerability",
    "asset_type",
];

const ASSET_DETAIL_COLUMNS: &[&str] = &[
    "asset_id",
    "asset_name",
    "asset_description",
    "asset_note",
    "is_entrance",
    "is_target",
    "priority",
    "has_vulnerability",
    "ttb",
    "asset_type",
    "segment_name",
];

const NEIGHBOR_COLUMNS: &[&str] = &["neighbor_id", "direction"];

const ASSET_TYPE_COLUMNS: &[&str] = &["type_id", "type_name"];

const CONNECTIVITY_SCAN: &str = "MATCH (a:Asset)-[e:CONNECTS_TO]->(b:Asset)
OPTIONAL MATCH (a)-[:HAS_TYPE]->(at:AssetType)
OPTIONAL MATCH (b)-[:HAS_TYPE]->(bt:AssetType)
RETURN
  a.asset_id AS src_asset_id,
  a.asset_name AS src_asset_name,
  a.is_entrance AS src_is_entrance,
  a.is_target AS src_is_target,
  a.priority AS src_priority,
  a.has_vulnerability AS src_has_vulnerability,
  at.type_name AS src_asset_type,
  b.asset_id AS dst_asset_id,
  b.asset_name AS dst_asset_name,
  b.is_entrance AS dst_is_entrance,
  b.is_target AS dst_is_target,
  b.priority AS dst_priority,
  b.has_vulnerability AS dst_has_vulnerability,
  bt.type_name AS dst_asset_type,
  e.rank AS rank,
  e.connection_protocol AS connection_protocol,
  e.connection_port AS connection_port
ORDER BY src_asset_id, dst_asset_id, rank
LIMIT $limit";

const ASSET_LIST: &str = "MATCH (a:Asset)
OPTIONAL MATCH (a)-[:HAS_TYPE]->(t:AssetType)
RETURN
  a.asset_id AS asset_id,
  a.asset_name AS asset_name,
  a.is_entrance AS is_entrance,
  a.is_target AS is_target,
  a.priority AS priority,
  a.has_vulnerability AS has_vulnerability,
  t.type_name AS asset_type
ORDER BY asset_id";

const ASSET_DETAIL: &str = "MATCH (a:Asset {asset_id: $asset_id})
OPTIONAL MATCH (a)-[:HAS_TYPE]->(t:AssetType)
OPTIONAL MATCH (a)-[:BELONGS_TO]->(s:NetworkSegment)
RETURN
  a.asset_id AS asset_id,
  a.asset_name AS asset_name,
  a.asset_description AS asset_description,
  a.asset_note AS asset_note,
  a.is_entrance AS is_entrance,
  a.is_target AS is_target,
  a.priority AS priority,
  a.has_vulnerability AS has_vulnerability,
  a.ttb AS ttb,
  t.type_name AS asset_type,
  s.segment_name AS segment_name
LIMIT 1";

const NEIGHBORS: &str = "MATCH (a:Asset {asset_id: $asset_id})-[:CONNECTS_TO]->(b:Asset)
RETURN b.asset_id AS neighbor_id, 'outbound' AS direction
UNION
MATCH (a:Asset {asset_id: $asset_id})<-[:CONNECTS_TO]-(b:Asset)
RETURN b.asset_id AS neighbor_id, 'inbound' AS direction";

const ASSET_TYPES: &str = "MATCH (t:AssetType)
RETURN DISTINCT t.type_id AS type_id, t.type_name AS type_name
ORDER BY type_id";

const CONNECTIONS_BETWEEN: &str =
    "MATCH (a:Asset {asset_id: $source_id})-[e:CONNECTS_TO]->(b:Asset {asset_id: $target_id})
OPTIONAL MATCH (a)-[:HAS_TYPE]->(at:AssetType)
OPTIONAL MATCH (b)-[:HAS_TYPE]->(bt:AssetType)
RETURN
  a.asset_id AS src_asset_id,
  a.asset_name AS src_asset_name,
  a.is_entrance AS src_is_entrance,
  a.is_target AS src_is_target,
  a.priority AS src_priority,
  a.has_vulnerability AS src_has_vulnerability,
  at.type_name AS src_asset_type,
  b.asset_id AS dst_asset_id,
  b.asset_name AS dst_asset_name,
  b.is_entrance AS dst_is_entrance,
  b.is_target AS dst_is_target,
  b.priority AS dst_priority,
  b.has_vulnerability AS dst_has_vulnerability,
  bt.type_name AS dst_asset_type,
  e.rank AS rank,
  e.connection_protocol AS connection_protocol,
  e.connection_port AS connection_port,
  a.asset_description AS src_asset_description,
  b.asset_description AS dst_asset_description
ORDER BY rank";

impl QueryTemplate {
    pub const ALL: [QueryTemplate; 6] = [
        Self::ConnectivityScan,
        Self::AssetList,
        Self::AssetDetail,
        Self::Neighbors,
        Self::AssetTypes,
        Self::ConnectionsBetween,
    ];

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConnectivityScan => "connectivity_scan",
            Self::AssetList => "asset_list",
            Self::AssetDetail => "asset_detail",
            Self::Neighbors => "neighbors",
            Self::AssetTypes => "asset_types",
            Self::ConnectionsBetween => "connections_between",
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            Self::ConnectivityScan
            | Self::AssetList
            | Self::AssetDetail
            | Self::ConnectionsBetween => Dialect::Pattern,
            Self::Neighbors | Self::AssetTypes => Dialect::Traversal,
        }
    }

    /// The Cypher text, with parameters left unbound.
    pub fn text(&self) -> &'static str {
        match self {
            Self::ConnectivityScan => CONNECTIVITY_SCAN,
            Self::AssetList => ASSET_LIST,
            Self::AssetDetail => ASSET_DETAIL,
            Self::Neighbors => NEIGHBORS,
            Self::AssetTypes => ASSET_TYPES,
            Self::ConnectionsBetween => CONNECTIONS_BETWEEN,
        }
    }

    /// Result columns, in the order cells appear in each row.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::ConnectivityScan => CONNECTIVITY_COLUMNS,
            Self::AssetList => ASSET_LIST_COLUMNS,
            Self::AssetDetail => ASSET_DETAIL_COLUMNS,
            Self::Neighbors => NEIGHBOR_COLUMNS,
            Self::AssetTypes => ASSET_TYPE_COLUMNS,
            Self::ConnectionsBetween => PAIR_COLUMNS,
        }
    }

    /// Parameter names the template expects to be bound.
    pub fn param_names(&self) -> &'static [&'static str] {
        match self {
            Self::ConnectivityScan => &["limit"],
            Self::AssetDetail | Self::Neighbors => &["asset_id"],
            Self::ConnectionsBetween => &["source_id", "target_id"],
            Self::AssetList | Self::AssetTypes => &[],
        }
    }
}
