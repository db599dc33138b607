//! Error types for wave harmonization.

use nsfh_ingest::IngestError;
use nsfh_model::{ModelError, Wave};
use thiserror::Error;

/// Run-level faults raised while harmonizing a wave.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Invalid bin configuration.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The wave joins a roster extract but none was supplied.
    #[error("{wave} requires a roster extract")]
    MissingRoster { wave: Wave },

    /// A roster was supplied for a single-extract wave.
    #[error("{wave} does not take a roster extract")]
    UnexpectedRoster { wave: Wave },
}

pub type Result<T> = std::result::Result<T, TransformError>;
