//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.devpulse.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".devpulse.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// High-performer and AI-usage thresholds.
    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding `<table>.csv` files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Table to analyze.
    #[serde(default = "default_table")]
    pub table: String,

    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            table: default_table(),
            output: default_output(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_table() -> String {
    "ai_dev_csv".to_string()
}

fn default_output() -> String {
    "devpulse_report.md".to_string()
}

/// Report-specific constants. The defaults reproduce the original report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Minimum commits for a high performer.
    #[serde(default = "default_min_commits")]
    pub min_commits: u32,

    /// Maximum bugs for a high performer.
    #[serde(default = "default_max_bugs")]
    pub max_bugs: u32,

    /// How many high performers to list.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// AI usage hours at which the Medium bucket starts.
    #[serde(default = "default_medium_usage_from")]
    pub medium_usage_from: f64,

    /// AI usage hours at which the High bucket starts.
    #[serde(default = "default_high_usage_from")]
    pub high_usage_from: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            min_commits: default_min_commits(),
            max_bugs: default_max_bugs(),
            top_n: default_top_n(),
            medium_usage_from: default_medium_usage_from(),
            high_usage_from: default_high_usage_from(),
        }
    }
}

fn default_min_commits() -> u32 {
    7
}

fn default_max_bugs() -> u32 {
    1
}

fn default_top_n() -> usize {
    10
}

fn default_medium_usage_from() -> f64 {
    1.0
}

fn default_high_usage_from() -> f64 {
    2.0
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Include the visualization section.
    #[serde(default = "default_true")]
    pub include_charts: bool,

    /// Recommendation bullets printed at the end of the report.
    #[serde(default = "default_recommendations")]
    pub recommendations: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_charts: true,
            recommendations: default_recommendations(),
        }
    }
}

fn default_title() -> String {
    "AI Developer Productivity Analysis".to_string()
}

fn default_true() -> bool {
    true
}

fn default_recommendations() -> Vec<String> {
    vec![
        "Use AI tools 2-3 hours daily for max productivity.",
        "Aim for 7+ hours of sleep for better performance.",
        "Keep distractions low (<3 per day).",
        "Moderate caffeine intake (~400-500mg) correlates with good results.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.devpulse.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.data_dir {
            self.general.data_dir = dir.display().to_string();
        }
        if let Some(ref table) = args.table {
            self.general.table = table.clone();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        // Thresholds
        if let Some(min_commits) = args.min_commits {
            self.thresholds.min_commits = min_commits;
        }
        if let Some(max_bugs) = args.max_bugs {
            self.thresholds.max_bugs = max_bugs;
        }
        if let Some(top_n) = args.top_n {
            self.thresholds.top_n = top_n;
        }

        // Flags always override
        if args.no_charts {
            self.report.include_charts = false;
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;

        if !t.medium_usage_from.is_finite() || !t.high_usage_from.is_finite() {
            bail!("AI usage thresholds must be finite numbers");
        }
        if t.medium_usage_from < 0.0 {
            bail!("thresholds.medium_usage_from must not be negative");
        }
        if t.medium_usage_from > t.high_usage_from {
            bail!(
                "thresholds.medium_usage_from ({}) must not exceed thresholds.high_usage_from ({})",
                t.medium_usage_from,
                t.high_usage_from
            );
        }
        if t.top_n == 0 {
            bail!("thresholds.top_n must be at least 1");
        }
        if self.general.table.trim().is_empty() {
            bail!("general.table must not be empty");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String> {
        let config = Config::default();
        toml::to_string_pretty(&config).context("Failed to serialize default configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.table, "ai_dev_csv");
        assert_eq!(config.thresholds.min_commits, 7);
        assert_eq!(config.thresholds.max_bugs, 1);
        assert_eq!(config.thresholds.top_n, 10);
        assert_eq!(config.thresholds.medium_usage_from, 1.0);
        assert_eq!(config.thresholds.high_usage_from, 2.0);
        assert_eq!(config.report.recommendations.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
data_dir = "datasets"
table = "sessions"

[thresholds]
min_commits = 5
high_usage_from = 3.0

[report]
include_charts = false
recommendations = ["Ship smaller changes."]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.data_dir, "datasets");
        assert_eq!(config.general.table, "sessions");
        assert_eq!(config.general.output, "devpulse_report.md");
        assert_eq!(config.thresholds.min_commits, 5);
        assert_eq!(config.thresholds.max_bugs, 1);
        assert_eq!(config.thresholds.high_usage_from, 3.0);
        assert!(!config.report.include_charts);
        assert_eq!(config.report.recommendations, vec!["Ship smaller changes."]);
    }

    #[test]
    fn test_validate_rejects_inverted_buckets() {
        let mut config = Config::default();
        config.thresholds.medium_usage_from = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.thresholds.top_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml().unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("medium_usage_from = 1.0"));
        assert!(!toml_str.contains("verbose"));
        assert!(toml_str.contains("[thresholds]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.thresholds.min_commits, 7);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[thresholds]\ntop_n = 3\n").unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.thresholds.top_n, 3);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[thresholds\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }
}
