//! Summary tables for one harmonized wave and their sheets.

use nsfh_model::{AggregateCell, AnalyticRecord, BinSet, GapRow, SummaryTables};
use nsfh_transform::HarmonizedWave;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::aggregate::{CohortField, aggregate};
use crate::error::Result;
use crate::gap::ever_partnered_gap;
use crate::sheets::{SheetFrame, Workbook, frame};
use crate::suppression::suppress;

/// Builds `primary_all`, `primary_present`, `ever_partnered_gap` and
/// `macro_all` from analytic records.
pub fn build_summary_tables(
    records: &[&AnalyticRecord],
    primary_bins: &BinSet,
    macro_bins: &BinSet,
    min_n: usize,
) -> SummaryTables {
    let primary_all = aggregate(records.iter().copied(), primary_bins, CohortField::Primary);
    let primary_present = suppress(&primary_all, min_n);
    let ever_partnered_gap = ever_partnered_gap(&primary_present);
    let macro_all = aggregate(records.iter().copied(), macro_bins, CohortField::Macro);
    debug!(
        primary_cells = primary_all.len(),
        present_cells = primary_present.len(),
        gap_rows = ever_partnered_gap.len(),
        macro_cells = macro_all.len(),
        min_n,
        "summary tables built"
    );
    SummaryTables {
        primary_all,
        primary_present,
        ever_partnered_gap,
        macro_all,
    }
}

/// [`build_summary_tables`] over a harmonized wave.
pub fn tabulate(wave: &HarmonizedWave, min_n: usize) -> SummaryTables {
    let records: Vec<&AnalyticRecord> = wave.analytic().collect();
    build_summary_tables(&records, &wave.primary_bins, &wave.macro_bins, min_n)
}

/// Sheet names of the tables workbook, in write order.
pub const TABLE_SHEETS: [&str; 4] = [
    "primary_all",
    "primary_present",
    "ever_partnered_gap",
    "macro_all",
];

/// Columns of an aggregate table, cohort first.
pub(crate) fn aggregate_columns(cohort_column: &str, cells: &[AggregateCell]) -> Vec<Series> {
    let cohorts: Vec<&str> = cells.iter().map(|cell| cell.cohort.as_str()).collect();
    let sexes: Vec<&str> = cells.iter().map(|cell| cell.sex.label()).collect();
    let n: Vec<u64> = cells.iter().map(|cell| cell.n as u64).collect();
    let partnered: Vec<f64> = cells.iter().map(|cell| cell.p_ever_partnered).collect();
    let cohab: Vec<Option<f64>> = cells
        .iter()
        .map(|cell| cell.mean_num_cohab_partners_if_partnered)
        .collect();
    let marriages: Vec<Option<f64>> = cells
        .iter()
        .map(|cell| cell.mean_num_marriages_if_partnered)
        .collect();
    let remarried: Vec<Option<f64>> = cells
        .iter()
        .map(|cell| cell.p_remarried_2plus_if_partnered)
        .collect();
    vec![
        Series::new(cohort_column.into(), cohorts),
        Series::new("sex_label".into(), sexes),
        Series::new("N".into(), n),
        Series::new("P_ever_partnered".into(), partnered),
        Series::new("Mean_num_cohab_partners_if_partnered".into(), cohab),
        Series::new("Mean_num_marriages_if_partnered".into(), marriages),
        Series::new("P_remarried_2plus_if_partnered".into(), remarried),
    ]
}

pub(crate) fn gap_columns(rows: &[GapRow]) -> Vec<Series> {
    let cohorts: Vec<&str> = rows.iter().map(|row| row.cohort.as_str()).collect();
    let female: Vec<Option<f64>> = rows.iter().map(|row| row.female).collect();
    let male: Vec<Option<f64>> = rows.iter().map(|row| row.male).collect();
    let gap: Vec<Option<f64>> = rows.iter().map(|row| row.gap).collect();
    vec![
        Series::new("cohort_primary".into(), cohorts),
        Series::new("P_ever_partnered_Female".into(), female),
        Series::new("P_ever_partnered_Male".into(), male),
        Series::new("Female_minus_Male_P_ever_partnered".into(), gap),
    ]
}

pub(crate) fn aggregate_frame(
    sheet: &str,
    cohort_column: &str,
    cells: &[AggregateCell],
) -> Result<DataFrame> {
    frame(sheet, aggregate_columns(cohort_column, cells))
}

pub(crate) fn gap_frame(sheet: &str, rows: &[GapRow]) -> Result<DataFrame> {
    frame(sheet, gap_columns(rows))
}

/// The `tables` workbook.
pub fn tables_workbook(tables: &SummaryTables) -> Result<Workbook> {
    let [all, present, gap, macro_all] = TABLE_SHEETS;
    Ok(Workbook::new("tables")
        .with_sheet(SheetFrame::new(
            all,
            aggregate_frame(all, "cohort_primary", &tables.primary_all)?,
        ))
        .with_sheet(SheetFrame::new(
            present,
            aggregate_frame(present, "cohort_primary", &tables.primary_present)?,
        ))
        .with_sheet(SheetFrame::new(
            gap,
            gap_frame(gap, &tables.ever_partnered_gap)?,
        ))
        .with_sheet(SheetFrame::new(
            macro_all,
            aggregate_frame(macro_all, "cohort_macro", &tables.macro_all)?,
        )))
}
