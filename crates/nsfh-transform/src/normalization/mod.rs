//! Raw cell normalization.
//!
//! - **numeric**: integer parsing of extract cells
//! - **sentinel**: per-field missing-code tables

pub mod numeric;
pub mod sentinel;

pub use numeric::{is_blank, parse_integral};
pub use sentinel::{
    COMMON_MISSING_CODES, SentinelNormalizer, SentinelSet, WAVE1_MARRIAGE_MISSING,
    normalize_value,
};
