//! Borrowed views of raw respondent rows.

use nsfh_model::SourceRef;

use crate::columns::ColumnIndex;

/// One row of one extract.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a ColumnIndex,
    values: &'a [String],
    /// Suffix under which this row's columns are also addressable.
    suffix: Option<&'a str>,
}

impl<'a> RowView<'a> {
    pub fn new(columns: &'a ColumnIndex, values: &'a [String]) -> Self {
        Self {
            columns,
            values,
            suffix: None,
        }
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: &'a str) -> Self {
        self.suffix = Some(suffix);
        self
    }

    fn lookup(&self, column: &str) -> Option<&'a str> {
        let idx = self.columns.position(column)?;
        self.values.get(idx).map(String::as_str)
    }

    pub fn get(&self, column: &str) -> Option<&'a str> {
        if let Some(stripped) = self.suffix.and_then(|suffix| column.strip_suffix(suffix))
            && let Some(value) = self.lookup(stripped)
        {
            return Some(value);
        }
        self.lookup(column)
    }
}

/// A respondent's raw fields, possibly spanning several joined extracts.
///
/// Lookups search the parts in order, so the main extract shadows the roster
/// on shared column names.
#[derive(Debug, Clone)]
pub struct RawRecord<'a> {
    source: SourceRef,
    parts: Vec<RowView<'a>>,
}

impl<'a> RawRecord<'a> {
    pub fn new(source: SourceRef, row: RowView<'a>) -> Self {
        Self {
            source,
            parts: vec![row],
        }
    }

    /// Appends a joined row from another extract.
    #[must_use]
    pub fn joined(mut self, row: RowView<'a>) -> Self {
        self.parts.push(row);
        self
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// Raw cell text for an exact column name, `None` when no part has it.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.parts.iter().find_map(|part| part.get(column))
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}
