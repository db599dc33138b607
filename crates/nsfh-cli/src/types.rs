use std::path::PathBuf;

use nsfh_model::{FaultSummary, StackedTables, SummaryTables, Wave, WaveOptions};
use nsfh_transform::HarmonizedWave;
use serde::Serialize;

/// SHA-256 of one input extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputDigest {
    /// `main` or `roster`.
    pub role: String,
    pub file: String,
    pub rows: usize,
    pub sha256: String,
}

/// Row count of one output sheet, with its path relative to the wave directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRows {
    pub workbook: String,
    pub sheet: String,
    pub rows: usize,
    pub file: String,
}

/// Contents of `run_report.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub wave: Wave,
    pub options: WaveOptions,
    pub inputs: Vec<InputDigest>,
    pub primary_bins: Vec<String>,
    pub faults: FaultSummary,
    pub sheets: Vec<SheetRows>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct WaveResult {
    pub wave: Wave,
    /// `<output_dir>/<wave>`.
    pub wave_dir: PathBuf,
    pub report: RunReport,
    /// `None` on a dry run.
    pub report_path: Option<PathBuf>,
    pub tables: SummaryTables,
    pub harmonized: HarmonizedWave,
}

/// Outcome of the stacked stage of `all`.
#[derive(Debug)]
pub struct StackedResult {
    pub waves: Vec<Wave>,
    pub min_n: usize,
    /// `<output_dir>/stacked`, or `None` on a dry run.
    pub stacked_dir: Option<PathBuf>,
    pub tables: StackedTables,
    pub sheets: Vec<SheetRows>,
}
