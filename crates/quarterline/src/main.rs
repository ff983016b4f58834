//! `qline` - CLI for quarterline
//!
//! This binary applies the quarter-series normalizer to dataset JSON and
//! prints the results as plain text or JSON.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

use quarterline::cli::{
    Cli, Command, ConfigCommand, DatasetCommand, OutputFormat, QuarterCommand, RangeCommand,
    TrendCommand,
};
use quarterline::dataset::{read_average, read_groups, Source};
use quarterline::quarter::fill_quarters_with;
use quarterline::series::normalize_with;
use quarterline::trend::{parse_delta, trend_color_with, TrendBadge};
use quarterline::{init_logging, render, Config, Error, Quarter, StatisticBlock};

/// Exit status for malformed datasets, labels, or deltas.
const EXIT_INPUT: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "Command failed");
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Input errors exit with [`EXIT_INPUT`]; everything else with 1.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(err) if err.is_input_error() => EXIT_INPUT,
        _ => 1,
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;
    debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Range(cmd) => handle_range(&config, &cmd),
        Command::Fill(cmd) => handle_fill(&config, &cmd),
        Command::Groups(cmd) => handle_groups(&config, &cmd),
        Command::Summary(cmd) => handle_summary(&config, &cmd),
        Command::Trend(cmd) => handle_trend(&config, &cmd),
        Command::Quarter(cmd) => handle_quarter(&cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_range(config: &Config, cmd: &RangeCommand) -> anyhow::Result<()> {
    let range = fill_quarters_with(&cmd.labels, config.labels.style)?;
    match cmd.format {
        OutputFormat::Json => print_json(&range)?,
        OutputFormat::Plain => {
            for label in &range {
                println!("{label}");
            }
        }
    }
    Ok(())
}

fn handle_fill(config: &Config, cmd: &DatasetCommand) -> anyhow::Result<()> {
    let source = Source::from_arg(cmd.file.as_deref());
    let dataset = read_average(&source).context("could not load average dataset")?;
    let filled = normalize_with(&dataset, config.labels.style)?;
    info!(points = dataset.len(), quarters = filled.len(), "Filled average series");

    match cmd.format {
        OutputFormat::Json => print_json(&filled)?,
        OutputFormat::Plain => print!("{}", render::series_table(&filled, config)),
    }
    Ok(())
}

fn handle_groups(config: &Config, cmd: &DatasetCommand) -> anyhow::Result<()> {
    let source = Source::from_arg(cmd.file.as_deref());
    let dataset = read_groups(&source).context("could not load group dataset")?;
    let filled = normalize_with(&dataset, config.labels.style)?;
    info!(points = dataset.len(), quarters = filled.len(), "Filled group series");

    match cmd.format {
        OutputFormat::Json => print_json(&filled)?,
        OutputFormat::Plain => print!("{}", render::group_table(&filled, config)),
    }
    Ok(())
}

fn handle_summary(config: &Config, cmd: &DatasetCommand) -> anyhow::Result<()> {
    let source = Source::from_arg(cmd.file.as_deref());
    let dataset = read_average(&source).context("could not load average dataset")?;
    let block = StatisticBlock::from_series(&dataset, &config.summary, config.trend.precision)?;

    match cmd.format {
        OutputFormat::Json => print_json(&block)?,
        OutputFormat::Plain => println!("{}", render::statistic(&block, config)),
    }
    Ok(())
}

fn handle_trend(config: &Config, cmd: &TrendCommand) -> anyhow::Result<()> {
    let delta = parse_delta(&cmd.delta)?;
    let badge = TrendBadge::classify(Some(delta), config.trend.precision);

    match cmd.format {
        OutputFormat::Json => {
            let color = trend_color_with(Some(delta), config.trend.precision);
            print_json(&serde_json::json!({
                "delta": delta,
                "label": badge.as_ref().map(|b| b.label.as_str()),
                "color": color,
                "hex": color.hex(&config.trend.palette),
            }))?;
        }
        OutputFormat::Plain => match badge {
            Some(badge) => println!("{}", render::badge_text(&badge, config)),
            None => println!("flat"),
        },
    }
    Ok(())
}

fn handle_quarter(cmd: &QuarterCommand) -> anyhow::Result<()> {
    let date = match &cmd.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))?,
        None => Local::now().date_naive(),
    };
    let quarter = Quarter::containing(date);
    let first = quarter.first_day().context("quarter start out of range")?;
    let last = quarter.last_day().context("quarter end out of range")?;

    match cmd.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "quarter": quarter.to_string(),
            "year": quarter.year(),
            "number": quarter.number(),
            "first_day": first,
            "last_day": last,
        }))?,
        OutputFormat::Plain => println!("{quarter}  {first} .. {last}"),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                print_json(config)?;
            } else {
                let palette = &config.trend.palette;
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Labels]");
                println!("  Style:              {:?}", config.labels.style);
                println!();
                println!("[Trend]");
                println!("  Precision:          {}", config.trend.precision);
                println!("  Positive color:     {}", palette.positive);
                println!("  Negative color:     {}", palette.negative);
                println!("  Neutral color:      {}", palette.neutral);
                println!();
                println!("[Summary]");
                println!("  Precision:          {}", config.summary.precision);
                println!("  Empty value:        {}", config.summary.empty_value);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_for_input_errors() {
        let err = anyhow::Error::new(Error::duplicate_quarter("Q1-2023"));
        assert_eq!(exit_status(&err), EXIT_INPUT);

        let err = anyhow::Error::new(Error::invalid_quarter("2023Q5")).context("could not load");
        assert_eq!(exit_status(&err), EXIT_INPUT);
    }

    #[test]
    fn test_exit_status_for_other_errors() {
        let err = anyhow::Error::new(Error::ConfigValidation {
            message: "bad palette".to_string(),
        });
        assert_eq!(exit_status(&err), 1);
        assert_eq!(exit_status(&anyhow::anyhow!("invalid date")), 1);
    }
}
