//! Tables over several harmonized waves.
//!
//! Pooled tables group every wave's analytic records by cohort label alone,
//! so a label shared by two waves forms one cell. Cohort order is the order
//! labels first appear, walking the waves in order and each wave's primary
//! bins in order. By-wave tables are each wave's own summary tables with a
//! leading `wave` column.

use nsfh_model::{AnalyticRecord, ProvenanceRecord, StackedTables, SummaryTables, WaveTables};
use nsfh_transform::HarmonizedWave;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::aggregate::{CohortField, aggregate, aggregate_by_labels};
use crate::error::Result;
use crate::gap::ever_partnered_gap;
use crate::provenance::{ANALYTIC_SHEET, respondent_frame};
use crate::sheets::{SheetFrame, Workbook, frame};
use crate::suppression::suppress;
use crate::tables::{aggregate_columns, aggregate_frame, gap_columns, gap_frame, tabulate};

/// Sheet names of the stacked tables workbook, in write order.
pub const STACKED_SHEETS: [&str; 7] = [
    "stacked_primary_all",
    "stacked_primary_present",
    "stacked_ever_partnered_gap",
    "stacked_macro_all",
    "stacked_primary_all_by_wave",
    "stacked_primary_present_by_wave",
    "stacked_ever_partnered_gap_by_wave",
];

/// Primary cohort labels of every wave, deduplicated in first-seen order.
fn pooled_labels<'w>(waves: &[&'w HarmonizedWave]) -> Vec<&'w str> {
    let mut labels: Vec<&str> = Vec::new();
    for label in waves.iter().copied().flat_map(|wave| wave.primary_bins.labels()) {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

/// Builds pooled and by-wave tables from harmonized waves.
pub fn build_stacked_tables(waves: &[&HarmonizedWave], min_n: usize) -> StackedTables {
    let records: Vec<&AnalyticRecord> = waves
        .iter()
        .copied()
        .flat_map(HarmonizedWave::analytic)
        .collect();
    let labels = pooled_labels(waves);
    let primary_all = aggregate_by_labels(records.iter().copied(), &labels, CohortField::Primary);
    let primary_present = suppress(&primary_all, min_n);
    let ever_partnered_gap = ever_partnered_gap(&primary_present);
    let macro_all = waves.first().map_or_else(Vec::new, |first| {
        aggregate(records.iter().copied(), &first.macro_bins, CohortField::Macro)
    });
    let pooled = SummaryTables {
        primary_all,
        primary_present,
        ever_partnered_gap,
        macro_all,
    };
    let by_wave: Vec<WaveTables> = waves
        .iter()
        .map(|wave| WaveTables {
            wave: wave.wave,
            tables: tabulate(wave, min_n),
        })
        .collect();
    debug!(
        waves = waves.len(),
        records = records.len(),
        pooled_cohorts = labels.len(),
        present_cohorts = pooled.present_cohorts().len(),
        "stacked tables built"
    );
    StackedTables {
        waves: waves.iter().map(|wave| wave.wave).collect(),
        pooled,
        by_wave,
    }
}

/// A by-wave frame: one wave's rows after another, `wave` first.
fn by_wave_frame<T>(
    sheet: &str,
    by_wave: &[WaveTables],
    rows: impl Fn(&SummaryTables) -> &[T],
    columns: impl Fn(&[T]) -> Vec<Series>,
) -> Result<DataFrame>
where
    T: Clone,
{
    let mut waves: Vec<&str> = Vec::new();
    let mut stacked: Vec<T> = Vec::new();
    for entry in by_wave {
        let wave_rows = rows(&entry.tables);
        waves.extend(std::iter::repeat_n(entry.wave.key(), wave_rows.len()));
        stacked.extend_from_slice(wave_rows);
    }
    let mut series = vec![Series::new("wave".into(), waves)];
    series.extend(columns(&stacked));
    frame(sheet, series)
}

/// The stacked `tables` workbook.
pub fn stacked_tables_workbook(tables: &StackedTables) -> Result<Workbook> {
    let [all, present, gap, macro_all, all_by_wave, present_by_wave, gap_by_wave] =
        STACKED_SHEETS;
    let pooled = &tables.pooled;
    Ok(Workbook::new("tables")
        .with_sheet(SheetFrame::new(
            all,
            aggregate_frame(all, "cohort_primary", &pooled.primary_all)?,
        ))
        .with_sheet(SheetFrame::new(
            present,
            aggregate_frame(present, "cohort_primary", &pooled.primary_present)?,
        ))
        .with_sheet(SheetFrame::new(
            gap,
            gap_frame(gap, &pooled.ever_partnered_gap)?,
        ))
        .with_sheet(SheetFrame::new(
            macro_all,
            aggregate_frame(macro_all, "cohort_macro", &pooled.macro_all)?,
        ))
        .with_sheet(SheetFrame::new(
            all_by_wave,
            by_wave_frame(
                all_by_wave,
                &tables.by_wave,
                |t| t.primary_all.as_slice(),
                |cells| aggregate_columns("cohort_primary", cells),
            )?,
        ))
        .with_sheet(SheetFrame::new(
            present_by_wave,
            by_wave_frame(
                present_by_wave,
                &tables.by_wave,
                |t| t.primary_present.as_slice(),
                |cells| aggregate_columns("cohort_primary", cells),
            )?,
        ))
        .with_sheet(SheetFrame::new(
            gap_by_wave,
            by_wave_frame(
                gap_by_wave,
                &tables.by_wave,
                |t| t.ever_partnered_gap.as_slice(),
                gap_columns,
            )?,
        )))
}

/// Analytic respondents of every wave in one sheet.
///
/// Raw columns are the union of the waves' audit fields, in first-seen
/// order; a wave without a field leaves its cells empty.
pub fn stacked_analytic_frame(waves: &[&HarmonizedWave]) -> Result<DataFrame> {
    let mut audit_fields: Vec<String> = Vec::new();
    for field in waves.iter().flat_map(|wave| &wave.audit_fields) {
        if !audit_fields.contains(field) {
            audit_fields.push(field.clone());
        }
    }
    let entries: Vec<&ProvenanceRecord> = waves
        .iter()
        .flat_map(|wave| &wave.provenance)
        .filter(|entry| entry.is_included())
        .collect();
    respondent_frame(ANALYTIC_SHEET, &entries, &audit_fields)
}

/// The stacked `analytic` workbook.
pub fn stacked_analytic_workbook(waves: &[&HarmonizedWave]) -> Result<Workbook> {
    Ok(Workbook::new("analytic").with_sheet(SheetFrame::new(
        ANALYTIC_SHEET,
        stacked_analytic_frame(waves)?,
    )))
}
