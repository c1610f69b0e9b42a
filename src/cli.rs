//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// devpulse - developer productivity analysis report
///
/// Loads a table of developer session metrics, computes summary
/// statistics, high performers, AI-usage impact and a correlation
/// matrix, and writes a Markdown or JSON report.
///
/// Examples:
///   devpulse --data ai_dev_productivity.csv
///   devpulse --data-dir data --table ai_dev_csv -o report.md
///   devpulse --data sessions.csv --format json --stdout
///   devpulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV file to analyze
    ///
    /// Overrides --data-dir: the table is read from this file directly.
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Directory containing <table>.csv files
    #[arg(long, value_name = "DIR", env = "DEVPULSE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Name of the table to analyze
    #[arg(short, long, value_name = "NAME")]
    pub table: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the report to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .devpulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Minimum commits for a high performer
    #[arg(long, value_name = "COUNT")]
    pub min_commits: Option<u32>,

    /// Maximum bugs for a high performer
    #[arg(long, value_name = "COUNT")]
    pub max_bugs: Option<u32>,

    /// Number of high performers to list
    #[arg(long, value_name = "COUNT")]
    pub top_n: Option<usize>,

    /// Leave the visualization section out of the report
    #[arg(long)]
    pub no_charts: bool,

    /// Exit with code 2 if the report produced warnings
    ///
    /// Useful for CI pipelines: empty views or undefined correlations
    /// then fail the run.
    #[arg(long)]
    pub fail_on_warning: bool,

    /// Generate a default .devpulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.top_n == Some(0) {
            return Err("--top-n must be at least 1".to_string());
        }

        if let Some(ref table) = self.table {
            if table.trim().is_empty() {
                return Err("Table name must not be empty".to_string());
            }
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Data file does not exist: {}", data.display()));
            }
            if !data.is_file() {
                return Err(format!("Data path is not a file: {}", data.display()));
            }
        }

        if let Some(ref dir) = self.data_dir {
            if !dir.is_dir() {
                return Err(format!("Data directory does not exist: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
