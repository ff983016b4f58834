//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Range command arguments.
#[derive(Debug, Args)]
pub struct RangeCommand {
    /// Quarter labels (e.g. Q1-2023 or 2023-Q1)
    #[arg(required = true)]
    pub labels: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments shared by commands that read a dataset.
#[derive(Debug, Args)]
pub struct DatasetCommand {
    /// Dataset JSON file (reads stdin when omitted or "-")
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Trend command arguments.
#[derive(Debug, Args)]
pub struct TrendCommand {
    /// Percentage delta, e.g. 12.5 or -4
    #[arg(allow_hyphen_values = true)]
    pub delta: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Quarter command arguments.
#[derive(Debug, Args)]
pub struct QuarterCommand {
    /// Calendar date (YYYY-MM-DD); defaults to today
    pub date: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
