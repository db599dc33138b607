//! Wave harmonization for NSFH extracts.
//!
//! Raw extracts go in; per-respondent provenance records with harmonized
//! partnership fields and cohort labels come out.

pub mod adapters;
pub mod cohort;
pub mod error;
pub mod normalization;
pub mod pipeline;

pub use adapters::{BoundField, Harmonized, WaveAdapter, bind_adapter};
pub use cohort::{BinningPolicy, CohortAssigner, equal_width_bins, macro_bins};
pub use error::{Result, TransformError};
pub use normalization::{SentinelNormalizer, SentinelSet, normalize_value};
pub use pipeline::{HarmonizedWave, WaveInputs, harmonize};
