//! Delimited extract loading.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;
use nsfh_model::SourceRef;
use tracing::{debug, warn};

use crate::columns::ColumnIndex;
use crate::error::{IngestError, Result};
use crate::record::{RawRecord, RowView};

#[derive(Debug, Clone)]
struct TableRow {
    /// 1-based data row number in the source file.
    number: u64,
    values: Vec<String>,
}

/// A raw extract with every cell kept as text.
#[derive(Debug, Clone)]
pub struct RawTable {
    name: String,
    columns: ColumnIndex,
    rows: Vec<TableRow>,
}

impl RawTable {
    /// Builds a table from already-split rows; rows are padded or truncated
    /// to the header width.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, mut values)| {
                values.resize(width, String::new());
                TableRow {
                    number: idx as u64 + 1,
                    values,
                }
            })
            .collect();
        Self {
            name: name.into(),
            columns: ColumnIndex::new(headers),
            rows,
        }
    }

    /// Identifier used in source references (the file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        self.columns.names()
    }

    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw view of row `idx` (0-based).
    pub fn row(&self, idx: usize) -> Option<RowView<'_>> {
        self.rows
            .get(idx)
            .map(|row| RowView::new(&self.columns, &row.values))
    }

    pub fn record(&self, idx: usize) -> Option<RawRecord<'_>> {
        let row = self.rows.get(idx)?;
        let source = SourceRef {
            source: self.name.clone(),
            record: row.number,
        };
        Some(RawRecord::new(
            source,
            RowView::new(&self.columns, &row.values),
        ))
    }

    pub fn records(&self) -> impl Iterator<Item = RawRecord<'_>> + '_ {
        (0..self.rows.len()).filter_map(|idx| self.record(idx))
    }

    /// Keeps rows whose value in `column` satisfies `keep`; returns the
    /// number of rows dropped. Kept rows retain their source row numbers.
    /// A table without `column` is left untouched.
    pub fn retain_rows<F>(&mut self, column: &str, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let Some(idx) = self.columns.position(column) else {
            return 0;
        };
        let before = self.rows.len();
        self.rows
            .retain(|row| keep(row.values.get(idx).map(String::as_str).unwrap_or("")));
        before - self.rows.len()
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().to_string()
}

/// Picks the field delimiter from the file extension, falling back to the
/// header line.
pub fn detect_delimiter(path: &Path) -> Result<u8> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("tsv" | "tab") => return Ok(b'\t'),
        Some("csv") => return Ok(b','),
        _ => {}
    }
    let file = open(path)?;
    let mut first_line = String::new();
    BufReader::new(file)
        .read_line(&mut first_line)
        .map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let tabs = first_line.matches('\t').count();
    let commas = first_line.matches(',').count();
    Ok(if tabs >= commas && tabs > 0 {
        b'\t'
    } else {
        b','
    })
}

fn open(path: &Path) -> Result<File> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_headers(record: &csv::StringRecord, path: &Path) -> Result<Vec<String>> {
    let names: Vec<String> = record.iter().map(normalize_header).collect();
    let mut seen = BTreeSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(IngestError::DuplicateColumn {
                column: name.clone(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(names)
}

/// Reads an extract, detecting its delimiter.
pub fn read_extract(path: &Path) -> Result<RawTable> {
    let delimiter = detect_delimiter(path)?;
    read_extract_with_delimiter(path, delimiter)
}

/// Reads an extract with an explicit delimiter. The first non-blank line is
/// the header; blank lines are skipped.
pub fn read_extract_with_delimiter(path: &Path, delimiter: u8) -> Result<RawTable> {
    let file = open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(file);

    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut truncated = 0usize;
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| IngestError::Parse {
            path: path.to_path_buf(),
            record: idx as u64 + 1,
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        if headers.is_none() {
            headers = Some(parse_headers(&record, path)?);
            continue;
        }
        let width = headers.as_ref().map_or(0, Vec::len);
        if record.len() > width {
            truncated += 1;
        }
        rows.push(record.iter().map(normalize_cell).collect());
    }
    let Some(headers) = headers else {
        return Err(IngestError::Empty {
            path: path.to_path_buf(),
        });
    };
    if truncated > 0 {
        warn!(
            path = %path.display(),
            rows = truncated,
            "rows wider than header were truncated"
        );
    }
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| path.display().to_string(), str::to_string);
    debug!(
        source = %name,
        columns = headers.len(),
        rows = rows.len(),
        delimiter = %char::from(delimiter).escape_default(),
        "extract loaded"
    );
    Ok(RawTable::new(name, headers, rows))
}
