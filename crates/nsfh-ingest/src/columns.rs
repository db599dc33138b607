//! Column lookup and alias resolution.

use std::collections::HashMap;

use crate::error::{IngestError, Result};

/// Header names of one extract with an exact-name index.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(names: Vec<String>) -> Self {
        let positions = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self { names, positions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }
}

/// Returns the first header matching a candidate, in candidate order.
///
/// Matching is case-insensitive; the header's own spelling is returned.
pub fn resolve_column(headers: &[String], candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .find(|header| header.eq_ignore_ascii_case(candidate))
            .cloned()
    })
}

/// Like [`resolve_column`] but a miss is a run-level fault.
pub fn require_column(
    headers: &[String],
    field: &str,
    candidates: &[&str],
    source_name: &str,
) -> Result<String> {
    resolve_column(headers, candidates).ok_or_else(|| IngestError::MissingColumn {
        field: field.to_string(),
        source_name: source_name.to_string(),
        candidates: candidates.join(", "),
    })
}
