//! Tabulation and output for harmonized NSFH waves.
//!
//! - **aggregate**: cohort × sex cells over respondents aged 35 or younger
//! - **suppression**: small-cell filter for the `primary_present` table
//! - **gap**: female-minus-male ever-partnered gap
//! - **provenance**: per-respondent `analytic` and `provenance` sheets
//! - **stacked**: pooled and by-wave tables over several waves
//! - **sheets**: named sheets written as CSV files

pub mod aggregate;
pub mod error;
pub mod gap;
pub mod provenance;
pub mod sheets;
pub mod stacked;
pub mod suppression;
pub mod tables;

pub use aggregate::{CohortField, aggregate, aggregate_by_labels};
pub use error::{ReportError, Result};
pub use gap::ever_partnered_gap;
pub use provenance::{analytic_frame, analytic_workbook, provenance_frame};
pub use sheets::{SheetFrame, Workbook, WrittenSheet};
pub use stacked::{
    STACKED_SHEETS, build_stacked_tables, stacked_analytic_frame, stacked_analytic_workbook,
    stacked_tables_workbook,
};
pub use suppression::suppress;
pub use tables::{TABLE_SHEETS, build_summary_tables, tables_workbook, tabulate};
