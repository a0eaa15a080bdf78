//! Null-safe decoding of raw result cells.
//!
//! Every decoder is total: a missing cell, a null, or a value of the wrong
//! type yields the column's declared default and sets `defaulted`. Nothing in
//! here returns an error or aborts a row.

use assetviz_core::types::{DEFAULT_PRIORITY, DEFAULT_PROTOCOL, DEFAULT_TTB};
use assetviz_core::{
    AssetDetailRecord, AssetNode, AssetTypeRecord, ConnectionEdge, ConnectivityRow, Direction,
    NeighborRecord,
};

use crate::store::{Cell, RawRow};
use crate::templates::{asset, connectivity, detail};

/// A decoded value and whether the column default was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub defaulted: bool,
}

impl<T> Decoded<T> {
    fn present(value: T) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            defaulted: true,
        }
    }
}

/// Integer columns and their field-specific defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntField {
    Priority,
    TimeToBypass,
    Counter,
}

impl IntField {
    pub fn default_value(&self) -> i64 {
        match self {
            Self::Priority => DEFAULT_PRIORITY,
            Self::TimeToBypass => DEFAULT_TTB,
            Self::Counter => 0,
        }
    }
}

fn non_null(row: &RawRow, index: usize) -> Option<&Cell> {
    row.cell(index).filter(|c| !c.is_null())
}

// ── Cell decoders ────────────────────────────────────────────────

/// String cell; null or non-string → `""`.
pub fn decode_string(row: &RawRow, index: usize) -> Decoded<String> {
    decode_string_or(row, index, "")
}

/// String cell with an explicit default.
pub fn decode_string_or(row: &RawRow, index: usize, default: &str) -> Decoded<String> {
    match non_null(row, index).and_then(Cell::as_str) {
        Some(s) => Decoded::present(s.to_string()),
        None => Decoded::fallback(default.to_string()),
    }
}

/// Boolean cell; null or non-boolean → `false`.
pub fn decode_bool(row: &RawRow, index: usize) -> Decoded<bool> {
    match non_null(row, index).and_then(Cell::as_bool) {
        Some(b) => Decoded::present(b),
        None => Decoded::fallback(false),
    }
}

/// Integer cell; null or non-integer → the field's default.
pub fn decode_int(row: &RawRow, index: usize, field: IntField) -> Decoded<i64> {
    match non_null(row, index).and_then(Cell::as_i64) {
        Some(n) => Decoded::present(n),
        None => Decoded::fallback(field.default_value()),
    }
}

/// Nullable string cell: `None` when null or not a string.
pub fn decode_opt_string(row: &RawRow, index: usize) -> Option<String> {
    non_null(row, index)
        .and_then(Cell::as_str)
        .map(str::to_string)
}

/// Edge rank; null, negative, or out-of-range → 0.
pub fn decode_rank(row: &RawRow, index: usize) -> Decoded<u32> {
    let raw = decode_int(row, index, IntField::Counter);
    match u32::try_from(raw.value) {
        Ok(rank) => Decoded {
            value: rank,
            defaulted: raw.defaulted,
        },
        Err(_) => Decoded::fallback(0),
    }
}

// ── Record decoders ──────────────────────────────────────────────

/// An asset from the seven-column asset block starting at `base`.
pub fn asset_at(row: &RawRow, base: usize) -> AssetNode {
    AssetNode {
        asset_id: decode_string(row, base + asset::ID).value,
        asset_name: decode_string(row, base + asset::NAME).value,
        asset_type: decode_opt_string(row, base + asset::TYPE),
        is_entrance: decode_bool(row, base + asset::IS_ENTRANCE).value,
        is_target: decode_bool(row, base + asset::IS_TARGET).value,
        priority: decode_int(row, base + asset::PRIORITY, IntField::Priority).value,
        has_vulnerability: decode_bool(row, base + asset::HAS_VULNERABILITY).value,
        ttb: None,
    }
}

/// A connectivity row: both endpoints and the ranked edge between them.
pub fn connectivity_row(row: &RawRow) -> ConnectivityRow {
    let source = asset_at(row, connectivity::SOURCE);
    let target = asset_at(row, connectivity::TARGET);
    let connection = ConnectionEdge {
        source: source.asset_id.clone(),
        target: target.asset_id.clone(),
        rank: decode_rank(row, connectivity::RANK).value,
        protocol: decode_string_or(row, connectivity::PROTOCOL, DEFAULT_PROTOCOL).value,
        port: decode_string(row, connectivity::PORT).value,
    };
    ConnectivityRow {
        source,
        target,
        connection,
    }
}

pub fn asset_detail(row: &RawRow) -> AssetDetailRecord {
    AssetDetailRecord {
        asset_id: decode_string(row, detail::ID).value,
        asset_name: decode_string(row, detail::NAME).value,
        asset_description: decode_opt_string(row, detail::DESCRIPTION),
        asset_note: decode_opt_string(row, detail::NOTE),
        asset_type: decode_opt_string(row, detail::TYPE),
        segment_name: decode_opt_string(row, detail::SEGMENT),
        is_entrance: decode_bool(row, detail::IS_ENTRANCE).value,
        is_target: decode_bool(row, detail::IS_TARGET).value,
        priority: decode_int(row, detail::PRIORITY, IntField::Priority).value,
        has_vulnerability: decode_bool(row, detail::HAS_VULNERABILITY).value,
        ttb: decode_int(row, detail::TTB, IntField::TimeToBypass).value,
    }
}

/// A neighbor, or `None` when the row carries no id or an unknown direction.
pub fn neighbor(row: &RawRow) -> Option<NeighborRecord> {
    let neighbor_id = decode_string(row, 0);
    if neighbor_id.defaulted || neighbor_id.value.is_empty() {
        return None;
    }
    let direction = decode_string(row, 1).value.parse::<Direction>().ok()?;
    Some(NeighborRecord {
        neighbor_id: neighbor_id.value,
        direction,
    })
}

pub fn asset_type(row: &RawRow) -> AssetTypeRecord {
    AssetTypeRecord {
        type_id: decode_string(row, 0).value,
        type_name: decode_string(row, 1).value,
    }
}
