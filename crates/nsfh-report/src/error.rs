//! Error types for table and sheet output.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Building or writing a frame failed.
    #[error("failed to build sheet {sheet}: {source}")]
    Frame {
        sheet: String,
        #[source]
        source: PolarsError,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
