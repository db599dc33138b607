//! Library side of the `nsfh-harmonize` binary.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
