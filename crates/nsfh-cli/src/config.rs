//! Run configuration: flags layered over an optional TOML file.
//!
//! Precedence is flag, then file, then the wave default. Relative paths in a
//! file resolve against the file's directory.
//!
//! ```toml
//! min_n = 200
//! output_dir = "out"
//!
//! [wave1]
//! input = "wave1.tsv"
//! reference_interview_year = 1987
//!
//! [wave3]
//! input = "main.tsv"
//! roster = "roster.tsv"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use nsfh_model::{DEFAULT_MIN_N, Wave, WaveOptions};
use serde::Deserialize;

/// Output directory used when neither a flag nor the file names one.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Subdirectory of the output directory holding the stacked outputs of `all`.
pub const STACKED_DIR: &str = "stacked";

/// Per-wave table of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveSection {
    pub input: Option<PathBuf>,
    pub roster: Option<PathBuf>,
    pub reference_interview_year: Option<i32>,
    pub min_n: Option<usize>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub min_n: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub wave1: Option<WaveSection>,
    pub wave2: Option<WaveSection>,
    pub wave3: Option<WaveSection>,
}

impl ConfigFile {
    /// Reads a configuration file, resolving relative paths against its
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut Option<PathBuf>| {
            if let Some(value) = path
                && value.is_relative()
            {
                *value = base.join(&*value);
            }
        };
        resolve(&mut self.output_dir);
        for section in [&mut self.wave1, &mut self.wave2, &mut self.wave3]
            .into_iter()
            .flatten()
        {
            resolve(&mut section.input);
            resolve(&mut section.roster);
        }
    }

    pub fn wave(&self, wave: Wave) -> Option<&WaveSection> {
        match wave {
            Wave::Wave1 => self.wave1.as_ref(),
            Wave::Wave2 => self.wave2.as_ref(),
            Wave::Wave3 => self.wave3.as_ref(),
        }
    }

    /// Waves with a table in the file, in wave order.
    pub fn configured_waves(&self) -> Vec<Wave> {
        Wave::ALL
            .into_iter()
            .filter(|wave| self.wave(*wave).is_some())
            .collect()
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOverrides {
    pub input: Option<PathBuf>,
    pub roster: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub reference_year: Option<i32>,
    pub min_n: Option<usize>,
    pub dry_run: bool,
}

/// A fully resolved wave run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveRun {
    pub options: WaveOptions,
    pub input: PathBuf,
    pub roster: Option<PathBuf>,
    /// Root output directory; the wave writes under `<output_dir>/<wave>/`.
    pub output_dir: PathBuf,
    pub dry_run: bool,
}

impl WaveRun {
    pub fn wave(&self) -> Wave {
        self.options.wave
    }

    pub fn wave_dir(&self) -> PathBuf {
        self.output_dir.join(self.wave().key())
    }
}

/// Resolves one wave's run from flags and an optional file.
pub fn resolve_run(
    wave: Wave,
    overrides: &RunOverrides,
    config: Option<&ConfigFile>,
) -> Result<WaveRun> {
    let section = config.and_then(|config| config.wave(wave));
    let Some(input) = overrides
        .input
        .clone()
        .or_else(|| section.and_then(|section| section.input.clone()))
    else {
        bail!("no input extract for {wave} (pass --input or set [{wave}].input)");
    };
    let roster = overrides
        .roster
        .clone()
        .or_else(|| section.and_then(|section| section.roster.clone()));
    if wave.requires_roster() && roster.is_none() {
        bail!("{wave} needs a roster extract (pass --roster or set [{wave}].roster)");
    }
    if !wave.requires_roster() && roster.is_some() {
        bail!("{wave} does not take a roster extract");
    }

    let mut options = WaveOptions::new(wave);
    if let Some(year) = overrides
        .reference_year
        .or_else(|| section.and_then(|section| section.reference_interview_year))
    {
        options = options.with_reference_year(year);
    }
    if let Some(min_n) = overrides
        .min_n
        .or_else(|| section.and_then(|section| section.min_n))
        .or_else(|| config.and_then(|config| config.min_n))
    {
        options = options.with_min_n(min_n);
    }
    Ok(WaveRun {
        options,
        input,
        roster,
        output_dir: output_dir(overrides, config),
        dry_run: overrides.dry_run,
    })
}

fn output_dir(overrides: &RunOverrides, config: Option<&ConfigFile>) -> PathBuf {
    overrides
        .output_dir
        .clone()
        .or_else(|| config.and_then(|config| config.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

/// The stacked stage of `all`, pooling every wave that ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackedRun {
    pub min_n: usize,
    pub output_dir: PathBuf,
    pub dry_run: bool,
}

impl StackedRun {
    /// `<output_dir>/stacked`.
    pub fn stacked_dir(&self) -> PathBuf {
        self.output_dir.join(STACKED_DIR)
    }
}

/// Resolves the stacked stage. Per-wave `min_n` values do not apply.
pub fn resolve_stacked(overrides: &RunOverrides, config: Option<&ConfigFile>) -> StackedRun {
    StackedRun {
        min_n: overrides
            .min_n
            .or_else(|| config.and_then(|config| config.min_n))
            .unwrap_or(DEFAULT_MIN_N),
        output_dir: output_dir(overrides, config),
        dry_run: overrides.dry_run,
    }
}
