//! Provenance and analytic sheets.
//!
//! Every respondent row becomes one provenance row, whatever its status,
//! age, or cohort. The raw columns are fixed per wave by the adapter's audit
//! field list, so rows of one wave always share a column set.

use nsfh_model::{AnalyticRecord, ProvenanceRecord};
use nsfh_transform::HarmonizedWave;
use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::error::Result;
use crate::sheets::{SheetFrame, Workbook, frame};

pub const ANALYTIC_SHEET: &str = "analytic";
pub const PROVENANCE_SHEET: &str = "provenance";

/// Prefix of raw audit columns.
pub const RAW_PREFIX: &str = "raw_";

fn record_column<T>(
    entries: &[&ProvenanceRecord],
    value: impl Fn(&AnalyticRecord) -> Option<T>,
) -> Vec<Option<T>> {
    entries
        .iter()
        .map(|entry| entry.record.as_ref().and_then(&value))
        .collect()
}

/// Normalization outcome of every missing field, e.g. `M95=sentinel(99)`.
fn missing_fields(entry: &ProvenanceRecord) -> String {
    entry
        .audit
        .iter()
        .filter_map(|field| {
            field
                .value
                .missing_reason()
                .map(|reason| format!("{}={reason}", field.field))
        })
        .collect::<Vec<_>>()
        .join(";")
}

pub(crate) fn respondent_frame(
    sheet: &str,
    entries: &[&ProvenanceRecord],
    audit_fields: &[String],
) -> Result<DataFrame> {
    let waves: Vec<&str> = entries.iter().map(|entry| entry.wave.key()).collect();
    let ids: Vec<&str> = entries
        .iter()
        .map(|entry| entry.respondent_id.as_str())
        .collect();
    let sources: Vec<String> = entries.iter().map(|entry| entry.source.to_string()).collect();
    let statuses: Vec<&str> = entries.iter().map(|entry| entry.status.label()).collect();
    let notes: Vec<String> = entries.iter().map(|entry| entry.notes_label()).collect();
    let missing: Vec<String> = entries.iter().map(|entry| missing_fields(entry)).collect();

    let mut series = vec![
        Series::new("wave".into(), waves),
        Series::new("respondent_id".into(), ids),
        Series::new("source".into(), sources),
        Series::new("status".into(), statuses),
        Series::new("age".into(), record_column(entries, |r| Some(r.age))),
        Series::new(
            "sex_label".into(),
            record_column(entries, |r| Some(r.sex.label())),
        ),
        Series::new(
            "birth_year".into(),
            record_column(entries, |r| Some(r.birth_year)),
        ),
        Series::new(
            "num_marriages".into(),
            record_column(entries, |r| r.num_marriages),
        ),
        Series::new(
            "ever_married".into(),
            record_column(entries, |r| r.ever_married),
        ),
        Series::new(
            "remarried_2plus".into(),
            record_column(entries, |r| r.remarried_2plus),
        ),
        Series::new(
            "num_cohab_partners".into(),
            record_column(entries, |r| r.num_cohab_partners),
        ),
        Series::new(
            "ever_cohabited".into(),
            record_column(entries, |r| r.ever_cohabited),
        ),
        Series::new(
            "ever_partnered".into(),
            record_column(entries, |r| Some(r.ever_partnered)),
        ),
        Series::new(
            "age_le_35".into(),
            record_column(entries, |r| Some(r.age_le_35)),
        ),
        Series::new(
            "cohort_primary".into(),
            record_column(entries, |r| r.cohort_primary.clone()),
        ),
        Series::new(
            "cohort_macro".into(),
            record_column(entries, |r| r.cohort_macro.clone()),
        ),
        Series::new("notes".into(), notes),
        Series::new("missing_fields".into(), missing),
    ];
    for field in audit_fields {
        let raw: Vec<Option<&str>> = entries
            .iter()
            .map(|entry| {
                entry
                    .audit_field(field)
                    .and_then(|audit| audit.raw.as_deref())
            })
            .collect();
        series.push(Series::new(format!("{RAW_PREFIX}{field}").into(), raw));
    }
    frame(sheet, series)
}

/// Provenance of every respondent.
pub fn provenance_frame(wave: &HarmonizedWave) -> Result<DataFrame> {
    let entries: Vec<&ProvenanceRecord> = wave.provenance.iter().collect();
    respondent_frame(PROVENANCE_SHEET, &entries, &wave.audit_fields)
}

/// Respondents with known sex and age.
pub fn analytic_frame(wave: &HarmonizedWave) -> Result<DataFrame> {
    let entries: Vec<&ProvenanceRecord> = wave
        .provenance
        .iter()
        .filter(|entry| entry.is_included())
        .collect();
    respondent_frame(ANALYTIC_SHEET, &entries, &wave.audit_fields)
}

/// The `analytic` workbook: `analytic` and `provenance` sheets.
pub fn analytic_workbook(wave: &HarmonizedWave) -> Result<Workbook> {
    Ok(Workbook::new("analytic")
        .with_sheet(SheetFrame::new(ANALYTIC_SHEET, analytic_frame(wave)?))
        .with_sheet(SheetFrame::new(PROVENANCE_SHEET, provenance_frame(wave)?)))
}
