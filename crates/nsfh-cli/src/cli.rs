//! CLI argument definitions for the wave harmonizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use nsfh_cli::logging::LogFormat;
use nsfh_model::Wave;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "nsfh-harmonize",
    version,
    about = "Harmonize NSFH survey waves into partnership tables by birth cohort and sex",
    long_about = "Harmonize one NSFH survey wave extract into an analytic file with a full\n\
                  provenance audit, then tabulate partnership outcomes by birth cohort and sex.\n\n\
                  Each wave writes an analytic workbook, a tables workbook and run_report.json\n\
                  under <OUTPUT_DIR>/<wave>/."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include respondent identifiers in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Harmonize and tabulate one wave.
    Run(RunArgs),

    /// Run every wave configured in a config file, then pool them into
    /// stacked tables under <output-dir>/stacked.
    All(AllArgs),

    /// List the supported wave instruments.
    Waves,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Wave instrument of the input extract.
    #[arg(value_enum, value_name = "WAVE")]
    pub wave: WaveArg,

    /// Main respondent extract (.tsv, .csv).
    #[arg(long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Partnership roster extract joined one-to-one to the main file (wave3 only).
    #[arg(long = "roster", value_name = "PATH")]
    pub roster: Option<PathBuf>,

    /// Root output directory (default: ./output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Interview year used to derive birth years from reported age.
    #[arg(long = "reference-year", value_name = "YEAR")]
    pub reference_year: Option<i32>,

    /// Minimum respondents per sex for a cohort to be reported.
    #[arg(long = "min-n", value_name = "N")]
    pub min_n: Option<usize>,

    /// TOML configuration file; flags take precedence over its values.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Harmonize and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct AllArgs {
    /// TOML configuration file naming each wave's extracts.
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Root output directory (overrides the config file).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Minimum respondents per sex (overrides the config file).
    #[arg(long = "min-n", value_name = "N")]
    pub min_n: Option<usize>,

    /// Harmonize and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WaveArg {
    Wave1,
    Wave2,
    Wave3,
}

impl From<WaveArg> for Wave {
    fn from(arg: WaveArg) -> Self {
        match arg {
            WaveArg::Wave1 => Wave::Wave1,
            WaveArg::Wave2 => Wave::Wave2,
            WaveArg::Wave3 => Wave::Wave3,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
