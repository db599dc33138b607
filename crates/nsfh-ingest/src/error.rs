//! Error types for extract ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort ingestion of an extract. Each one is a run-level fault.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Extract file not found.
    #[error("extract not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Delimited parsing failed (bad quoting, invalid UTF-8).
    #[error("failed to parse {path} at record {record}: {source}")]
    Parse {
        path: PathBuf,
        record: u64,
        #[source]
        source: csv::Error,
    },

    /// Extract has no header row.
    #[error("extract is empty: {path}")]
    Empty { path: PathBuf },

    /// Header row repeats a column name.
    #[error("duplicate column '{column}' in {path}")]
    DuplicateColumn { column: String, path: PathBuf },

    /// None of the candidate names for a required column is present.
    #[error("required column {field} not found in {source_name} (tried: {candidates})")]
    MissingColumn {
        field: String,
        source_name: String,
        candidates: String,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
