//! Shared fixtures for transform tests.
#![allow(dead_code)]

use nsfh_ingest::RawTable;

pub fn table(name: &str, headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        name,
        headers.iter().map(|h| (*h).to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| (*v).to_string()).collect())
            .collect(),
    )
}

pub fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}
