//! Wave run pipeline with explicit stages.
//!
//! 1. **Ingest**: read the extracts and digest them
//! 2. **Harmonize**: adapt fields, merge the roster, assign cohorts
//! 3. **Tabulate**: cohort × sex tables, suppression, gap
//! 4. **Output**: write both workbooks and `run_report.json`
//!
//! Each stage takes the output of the previous stage and returns typed results.
//! `all` adds a stacked stage over every wave that completed.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use nsfh_ingest::{RawTable, read_extract, sha256_file};
use nsfh_model::{RecordStatus, SummaryTables};
use nsfh_report::{
    Workbook, analytic_workbook, build_stacked_tables, stacked_analytic_workbook,
    stacked_tables_workbook, tables_workbook, tabulate,
};
use nsfh_transform::{HarmonizedWave, WaveInputs, harmonize};
use tracing::{debug, info, info_span, trace, warn};

use crate::config::{StackedRun, WaveRun};
use crate::logging::redact_value;
use crate::types::{InputDigest, RunReport, SheetRows, StackedResult, WaveResult};

/// File name of the per-wave run report.
pub const RUN_REPORT_FILE: &str = "run_report.json";

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    pub inputs: WaveInputs,
    pub digests: Vec<InputDigest>,
}

fn load(role: &str, path: &Path) -> Result<(RawTable, InputDigest)> {
    let table = read_extract(path).with_context(|| format!("read {role} extract"))?;
    let sha256 = sha256_file(path).with_context(|| format!("digest {}", path.display()))?;
    let digest = InputDigest {
        role: role.to_string(),
        file: table.name().to_string(),
        rows: table.len(),
        sha256,
    };
    Ok((table, digest))
}

/// Reads the main extract and, when configured, the roster.
pub fn ingest(run: &WaveRun) -> Result<IngestResult> {
    let (main, main_digest) = load("main", &run.input)?;
    let mut digests = vec![main_digest];
    let inputs = match &run.roster {
        Some(path) => {
            let (roster, roster_digest) = load("roster", path)?;
            digests.push(roster_digest);
            WaveInputs::with_roster(main, roster)
        }
        None => WaveInputs::single(main),
    };
    Ok(IngestResult { inputs, digests })
}

// ============================================================================
// Stage 2: Harmonize
// ============================================================================

pub fn harmonize_wave(run: &WaveRun, inputs: WaveInputs) -> Result<HarmonizedWave> {
    let wave = harmonize(&run.options, inputs)
        .with_context(|| format!("harmonize {}", run.wave()))?;
    for entry in &wave.provenance {
        if let RecordStatus::Excluded(reason) = entry.status {
            trace!(
                respondent = redact_value(&entry.respondent_id),
                source = %entry.source,
                reason = %reason,
                "respondent excluded"
            );
        }
    }
    Ok(wave)
}

// ============================================================================
// Stage 3: Tabulate
// ============================================================================

pub fn tabulate_wave(run: &WaveRun, wave: &HarmonizedWave) -> SummaryTables {
    let tables = tabulate(wave, run.options.min_n);
    let suppressed = tables
        .primary_all
        .iter()
        .filter(|cell| !tables.primary_present.contains(cell))
        .count();
    if suppressed > 0 {
        debug!(
            suppressed_cells = suppressed,
            min_n = run.options.min_n,
            "cohort cells below the reporting threshold"
        );
    }
    tables
}

// ============================================================================
// Stage 4: Output
// ============================================================================

/// Result of the output stage.
#[derive(Debug)]
pub struct OutputResult {
    pub sheets: Vec<SheetRows>,
}

fn sheet_rows(workbook: &Workbook) -> Vec<SheetRows> {
    workbook
        .sheets
        .iter()
        .map(|sheet| SheetRows {
            workbook: workbook.name.clone(),
            sheet: sheet.name.clone(),
            rows: sheet.rows(),
            file: format!("{}/{}.csv", workbook.name, sheet.name),
        })
        .collect()
}

/// Builds both workbooks and writes them unless this is a dry run.
pub fn output(
    run: &WaveRun,
    wave: &HarmonizedWave,
    tables: &SummaryTables,
) -> Result<OutputResult> {
    let workbooks = [
        analytic_workbook(wave).context("build analytic workbook")?,
        tables_workbook(tables).context("build tables workbook")?,
    ];
    let sheets = workbooks.iter().flat_map(sheet_rows).collect();
    if run.dry_run {
        info!(wave = %run.wave(), "dry run: outputs not written");
        return Ok(OutputResult { sheets });
    }
    let wave_dir = run.wave_dir();
    for workbook in &workbooks {
        workbook
            .write(&wave_dir)
            .with_context(|| format!("write {} workbook", workbook.name))?;
    }
    Ok(OutputResult { sheets })
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let mut json = serde_json::to_string_pretty(report).context("serialize run report")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}

/// Runs every stage for one wave.
pub fn run_wave(run: &WaveRun) -> Result<WaveResult> {
    let wave_key = run.wave();
    let span = info_span!("wave", wave = %wave_key);
    let _guard = span.enter();

    let ingest_start = Instant::now();
    let IngestResult { inputs, digests } =
        info_span!("ingest", input = %run.input.display()).in_scope(|| ingest(run))?;
    debug!(
        extracts = digests.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let harmonize_start = Instant::now();
    let wave = info_span!("harmonize").in_scope(|| harmonize_wave(run, inputs))?;
    debug!(
        respondents = wave.faults.respondents,
        duration_ms = harmonize_start.elapsed().as_millis(),
        "harmonize complete"
    );
    if wave.faults.orphan_roster_keys > 0 {
        warn!(
            orphan_roster_keys = wave.faults.orphan_roster_keys,
            "roster keys without a main respondent"
        );
    }

    let tabulate_start = Instant::now();
    let tables = info_span!("tabulate").in_scope(|| tabulate_wave(run, &wave));
    debug!(
        present_cohorts = tables.present_cohorts().len(),
        duration_ms = tabulate_start.elapsed().as_millis(),
        "tabulate complete"
    );

    let output_start = Instant::now();
    let OutputResult { sheets } =
        info_span!("output", dry_run = run.dry_run).in_scope(|| output(run, &wave, &tables))?;
    let report = RunReport {
        wave: wave_key,
        options: run.options.clone(),
        inputs: digests,
        primary_bins: wave.primary_bins.labels().map(str::to_string).collect(),
        faults: wave.faults.clone(),
        sheets,
        dry_run: run.dry_run,
    };
    let report_path = if run.dry_run {
        None
    } else {
        let path = run.wave_dir().join(RUN_REPORT_FILE);
        write_report(&path, &report)?;
        Some(path)
    };
    debug!(
        duration_ms = output_start.elapsed().as_millis(),
        "output complete"
    );
    info!(
        included = report.faults.included,
        excluded = report.faults.excluded(),
        "wave complete"
    );

    Ok(WaveResult {
        wave: wave_key,
        wave_dir: run.wave_dir(),
        report,
        report_path,
        tables,
        harmonized: wave,
    })
}

// ============================================================================
// Stacked stage
// ============================================================================

/// Pools the harmonized waves of one `all` run and writes the stacked
/// workbooks unless this is a dry run.
pub fn run_stacked(run: &StackedRun, waves: &[&HarmonizedWave]) -> Result<StackedResult> {
    let span = info_span!("stacked", waves = waves.len());
    let _guard = span.enter();
    let start = Instant::now();

    let tables = build_stacked_tables(waves, run.min_n);
    let workbooks = [
        stacked_analytic_workbook(waves).context("build stacked analytic workbook")?,
        stacked_tables_workbook(&tables).context("build stacked tables workbook")?,
    ];
    let sheets = workbooks.iter().flat_map(sheet_rows).collect();
    let stacked_dir = if run.dry_run {
        info!("dry run: stacked outputs not written");
        None
    } else {
        let dir = run.stacked_dir();
        for workbook in &workbooks {
            workbook
                .write(&dir)
                .with_context(|| format!("write stacked {} workbook", workbook.name))?;
        }
        Some(dir)
    };
    info!(
        present_cohorts = tables.pooled.present_cohorts().len(),
        duration_ms = start.elapsed().as_millis(),
        "stacked tables complete"
    );

    Ok(StackedResult {
        waves: tables.waves.clone(),
        min_n: run.min_n,
        stacked_dir,
        tables,
        sheets,
    })
}
