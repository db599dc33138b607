//! Strict one-to-one joins between a main extract and a companion extract.
//!
//! Every key must appear exactly once on each side. Keys that do not are
//! reported as [`JoinFault`]s and their rows never reach the merged stream;
//! no placeholder row is ever created for a missing match.

use std::collections::{BTreeMap, BTreeSet};

use nsfh_model::ReasonCode;
use tracing::debug;

use crate::csv_table::RawTable;
use crate::record::RawRecord;

/// Suffix applied to companion columns whose name collides with the main extract.
pub const ROSTER_SUFFIX: &str = "_roster";

/// A respondent key that did not match exactly once on both sides.
#[derive(Debug, Clone)]
pub struct JoinFault<'a> {
    pub key: String,
    pub main_count: usize,
    pub companion_count: usize,
    /// Main-extract rows carrying the key, kept for the audit trail.
    pub main_records: Vec<RawRecord<'a>>,
}

impl JoinFault<'_> {
    pub fn reason(&self) -> ReasonCode {
        if self.main_count == 1 && self.companion_count == 0 {
            ReasonCode::JoinUnmatched
        } else {
            ReasonCode::JoinDuplicate
        }
    }
}

/// Result of a one-to-one join.
#[derive(Debug, Clone)]
pub struct MergeOutcome<'a> {
    /// Column names addressable on merged records, main extract first.
    pub headers: Vec<String>,
    /// Joined records in main-extract order.
    pub merged: Vec<RawRecord<'a>>,
    /// Faulted keys in main-extract order of first appearance.
    pub faults: Vec<JoinFault<'a>>,
    /// Companion keys with no main-extract row.
    pub orphan_keys: Vec<String>,
}

impl MergeOutcome<'_> {
    pub fn fault_count(&self) -> usize {
        self.faults.len()
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_string()
}

fn key_positions(table: &RawTable, key_column: &str) -> BTreeMap<String, Vec<usize>> {
    let mut positions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for idx in 0..table.len() {
        let key = table
            .row(idx)
            .and_then(|row| row.get(key_column))
            .map(normalize_key)
            .unwrap_or_default();
        positions.entry(key).or_default().push(idx);
    }
    positions
}

/// Column names visible on merged records.
pub fn merged_headers(main: &RawTable, companion: &RawTable, suffix: &str) -> Vec<String> {
    let mut headers: Vec<String> = main.headers().to_vec();
    for name in companion.headers() {
        if main.columns().contains(name) {
            headers.push(format!("{name}{suffix}"));
        } else {
            headers.push(name.clone());
        }
    }
    headers
}

/// Joins `main` and `companion` on their key columns under a strict 1:1
/// cardinality rule.
///
/// Blank keys never match. Companion columns that collide with main columns
/// are addressable as `<name><suffix>`.
pub fn merge_one_to_one<'a>(
    main: &'a RawTable,
    main_key: &str,
    companion: &'a RawTable,
    companion_key: &str,
    suffix: &'a str,
) -> MergeOutcome<'a> {
    let main_positions = key_positions(main, main_key);
    let companion_positions = key_positions(companion, companion_key);

    let mut merged = Vec::new();
    let mut faults = Vec::new();
    let mut reported: BTreeSet<String> = BTreeSet::new();
    for idx in 0..main.len() {
        let Some(record) = main.record(idx) else {
            continue;
        };
        let key = record.get(main_key).map(normalize_key).unwrap_or_default();
        let main_count = main_positions.get(&key).map_or(0, Vec::len);
        let matches = if key.is_empty() {
            &[][..]
        } else {
            companion_positions
                .get(&key)
                .map_or(&[][..], Vec::as_slice)
        };
        if !key.is_empty() && main_count == 1 && matches.len() == 1 {
            if let Some(row) = companion.row(matches[0]) {
                merged.push(record.joined(row.with_suffix(suffix)));
            }
            continue;
        }
        if key.is_empty() {
            faults.push(JoinFault {
                key,
                main_count: 1,
                companion_count: 0,
                main_records: vec![record],
            });
            continue;
        }
        if reported.insert(key.clone()) {
            let main_records = main_positions
                .get(&key)
                .into_iter()
                .flatten()
                .filter_map(|&pos| main.record(pos))
                .collect();
            faults.push(JoinFault {
                key,
                main_count,
                companion_count: matches.len(),
                main_records,
            });
        }
    }

    let orphan_keys: Vec<String> = companion_positions
        .keys()
        .filter(|key| !key.is_empty() && !main_positions.contains_key(*key))
        .cloned()
        .collect();

    debug!(
        main = main.name(),
        companion = companion.name(),
        merged = merged.len(),
        faults = faults.len(),
        orphans = orphan_keys.len(),
        "one-to-one merge complete"
    );

    MergeOutcome {
        headers: merged_headers(main, companion, suffix),
        merged,
        faults,
        orphan_keys,
    }
}
