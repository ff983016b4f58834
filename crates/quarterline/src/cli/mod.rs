//! Command-line interface for quarterline.
//!
//! This module provides the CLI structure for the `qline` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DatasetCommand, OutputFormat, QuarterCommand, RangeCommand, TrendCommand,
};

/// qline - Fill quarterly chart datasets and label their trends
///
/// Reads dataset JSON as returned by the dashboard API and prints dense,
/// chronologically ordered series with gaps marked as placeholders.
#[derive(Debug, Parser)]
#[command(name = "qline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every quarter between the earliest and latest label
    Range(RangeCommand),

    /// Fill the average series of a dataset
    Fill(DatasetCommand),

    /// Fill the group series of a dataset
    Groups(DatasetCommand),

    /// Show the headline statistic of a dataset
    Summary(DatasetCommand),

    /// Classify a percentage delta
    Trend(TrendCommand),

    /// Show the quarter containing a date
    Quarter(QuarterCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "qline");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(
            parse(&["qline", "-q", "range", "Q1-2023"]).verbosity(),
            crate::logging::Verbosity::Quiet
        );
        assert_eq!(
            parse(&["qline", "range", "Q1-2023"]).verbosity(),
            crate::logging::Verbosity::Normal
        );
        assert_eq!(
            parse(&["qline", "-v", "range", "Q1-2023"]).verbosity(),
            crate::logging::Verbosity::Verbose
        );
        assert_eq!(
            parse(&["qline", "-vv", "range", "Q1-2023"]).verbosity(),
            crate::logging::Verbosity::Trace
        );
    }

    #[test]
    fn test_parse_range() {
        let cli = parse(&["qline", "range", "Q3-2023", "Q1-2023"]);
        match cli.command {
            Command::Range(cmd) => assert_eq!(cmd.labels, vec!["Q3-2023", "Q1-2023"]),
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_range_requires_labels() {
        assert!(Cli::try_parse_from(["qline", "range"]).is_err());
    }

    #[test]
    fn test_parse_fill_with_file_and_format() {
        let cli = parse(&["qline", "fill", "audit.json", "--format", "json"]);
        match cli.command {
            Command::Fill(cmd) => {
                assert_eq!(cmd.file, Some(PathBuf::from("audit.json")));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_fill_from_stdin() {
        let cli = parse(&["qline", "fill"]);
        assert!(matches!(cli.command, Command::Fill(DatasetCommand { file: None, .. })));
    }

    #[test]
    fn test_parse_negative_trend() {
        let cli = parse(&["qline", "trend", "-4"]);
        match cli.command {
            Command::Trend(cmd) => assert_eq!(cmd.delta, "-4"),
            other => panic!("expected trend, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_quarter_without_date() {
        let cli = parse(&["qline", "quarter"]);
        assert!(matches!(cli.command, Command::Quarter(QuarterCommand { date: None, .. })));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["qline", "-c", "/custom/config.toml", "config", "show"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: false })
        ));
    }
}
