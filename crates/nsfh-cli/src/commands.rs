use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use nsfh_cli::config::{ConfigFile, RunOverrides, resolve_run, resolve_stacked};
use nsfh_cli::pipeline::{run_stacked, run_wave};
use nsfh_cli::types::{StackedResult, WaveResult};
use nsfh_model::Wave;
use nsfh_transform::{BinningPolicy, HarmonizedWave};
use tracing::{error, info, info_span, warn};

use crate::cli::{AllArgs, RunArgs};
use crate::summary::apply_table_style;

pub fn run_waves() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        "Wave",
        "Fielded",
        "Reference year",
        "Roster",
        "Primary cohorts",
    ]);
    apply_table_style(&mut table);
    for wave in Wave::ALL {
        let binning = match BinningPolicy::primary_for(wave).context("build cohort bins")? {
            BinningPolicy::Fixed(bins) => bins.labels().collect::<Vec<_>>().join(", "),
            BinningPolicy::EqualWidth { width } => {
                format!("{width}-year bins over observed birth years")
            }
        };
        table.add_row(vec![
            wave.key().to_string(),
            wave.fielding_period().to_string(),
            wave.default_reference_year().to_string(),
            if wave.requires_roster() { "required" } else { "-" }.to_string(),
            binning,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_single(args: &RunArgs) -> Result<WaveResult> {
    let wave = Wave::from(args.wave);
    let config = args
        .config
        .as_deref()
        .map(ConfigFile::load)
        .transpose()?;
    let overrides = RunOverrides {
        input: args.input.clone(),
        roster: args.roster.clone(),
        output_dir: args.output_dir.clone(),
        reference_year: args.reference_year,
        min_n: args.min_n,
        dry_run: args.dry_run,
    };
    let run = resolve_run(wave, &overrides, config.as_ref())?;
    let start = Instant::now();
    let result = run_wave(&run)?;
    info!(
        wave = %wave,
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(result)
}

/// Outcome of `all`: each wave succeeds or fails on its own, and the
/// stacked stage runs over the waves that succeeded.
pub struct AllOutcome {
    pub results: Vec<WaveResult>,
    pub failures: Vec<(Wave, anyhow::Error)>,
    /// `None` when no wave succeeded.
    pub stacked: Option<Result<StackedResult>>,
}

pub fn run_all(args: &AllArgs) -> Result<AllOutcome> {
    let config = ConfigFile::load(&args.config)?;
    let waves = config.configured_waves();
    if waves.is_empty() {
        anyhow::bail!("{} configures no waves", args.config.display());
    }
    let overrides = RunOverrides {
        output_dir: args.output_dir.clone(),
        min_n: args.min_n,
        dry_run: args.dry_run,
        ..RunOverrides::default()
    };
    let span = info_span!("all", waves = waves.len());
    let _guard = span.enter();
    let mut outcome = AllOutcome {
        results: Vec::new(),
        failures: Vec::new(),
        stacked: None,
    };
    for wave in waves {
        let result = resolve_run(wave, &overrides, Some(&config))
            .and_then(|run| run_wave(&run))
            .with_context(|| format!("{wave} run failed"));
        match result {
            Ok(result) => outcome.results.push(result),
            Err(err) => {
                error!(wave = %wave, error = %format!("{err:#}"), "wave run failed");
                outcome.failures.push((wave, err));
            }
        }
    }

    if outcome.results.is_empty() {
        return Ok(outcome);
    }
    if !outcome.failures.is_empty() {
        warn!(
            failed = outcome.failures.len(),
            "stacking only the waves that completed"
        );
    }
    let run = resolve_stacked(&overrides, Some(&config));
    let waves: Vec<&HarmonizedWave> = outcome
        .results
        .iter()
        .map(|result| &result.harmonized)
        .collect();
    let stacked = run_stacked(&run, &waves).context("stacked run failed");
    if let Err(err) = &stacked {
        error!(error = %format!("{err:#}"), "stacked run failed");
    }
    outcome.stacked = Some(stacked);
    Ok(outcome)
}
