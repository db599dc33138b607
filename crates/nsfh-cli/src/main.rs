//! `nsfh-harmonize`: harmonize NSFH survey waves and tabulate partnership outcomes.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use nsfh_cli::logging::{LogConfig, init_logging};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_all, run_single, run_waves};
use crate::summary::{print_stacked_summary, print_summary};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    match dispatch(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Runs a subcommand; `Ok(false)` when some wave of `all` failed.
fn dispatch(command: Command) -> Result<bool> {
    match command {
        Command::Run(args) => {
            print_summary(&run_single(&args)?);
            Ok(true)
        }
        Command::All(args) => {
            let outcome = run_all(&args)?;
            outcome.results.iter().for_each(print_summary);
            let stacked_ok = match &outcome.stacked {
                Some(Ok(stacked)) => {
                    print_stacked_summary(stacked);
                    true
                }
                Some(Err(error)) => {
                    eprintln!("error: {error:#}");
                    false
                }
                None => true,
            };
            for (_, error) in &outcome.failures {
                eprintln!("error: {error:#}");
            }
            Ok(outcome.failures.is_empty() && stacked_ok)
        }
        Command::Waves => run_waves().map(|()| true),
    }
}

/// Flags win over `RUST_LOG`; `--log-level` wins over `-v`/`-q`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = cli.verbosity.is_present() || cli.log_level.is_some();
    LogConfig {
        level_filter: cli
            .log_level
            .map_or_else(|| cli.verbosity.tracing_level_filter(), Into::into),
        use_env_filter: !explicit,
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        log_data: cli.log_data,
        with_ansi: match cli.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
        },
        ..LogConfig::default()
    }
}
