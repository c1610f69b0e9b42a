//! Data models for the productivity report.
//!
//! This module contains the core data structures used throughout
//! the application: dataset records, the fixed column set, derived
//! summary rows and the final report.

use crate::report::ChartSpec;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One developer session from the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Hours spent coding.
    pub hours_coding: f64,
    /// Number of commits made.
    pub commits: u32,
    /// Number of bugs reported.
    pub bugs_reported: u32,
    /// Hours spent using AI tools. `None` when the source cell is empty.
    pub ai_usage_hours: Option<f64>,
    /// Whether the task succeeded (encoded 0/1 in the source).
    pub task_success: bool,
    /// Self-reported cognitive load.
    pub cognitive_load: f64,
    /// Caffeine intake in milligrams.
    pub coffee_intake_mg: f64,
    /// Number of distractions.
    pub distractions: f64,
    /// Hours of sleep.
    pub sleep_hours: f64,
}

/// A numeric column of the fixed report schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    HoursCoding,
    CoffeeIntakeMg,
    Distractions,
    SleepHours,
    Commits,
    BugsReported,
    AiUsageHours,
    CognitiveLoad,
    TaskSuccess,
}

impl Column {
    /// All schema columns, in correlation-matrix order.
    pub const ALL: [Column; 9] = [
        Column::HoursCoding,
        Column::CoffeeIntakeMg,
        Column::Distractions,
        Column::SleepHours,
        Column::Commits,
        Column::BugsReported,
        Column::AiUsageHours,
        Column::CognitiveLoad,
        Column::TaskSuccess,
    ];

    /// Column name as it appears in the dataset header.
    pub fn name(&self) -> &'static str {
        match self {
            Column::HoursCoding => "hours_coding",
            Column::CoffeeIntakeMg => "coffee_intake_mg",
            Column::Distractions => "distractions",
            Column::SleepHours => "sleep_hours",
            Column::Commits => "commits",
            Column::BugsReported => "bugs_reported",
            Column::AiUsageHours => "ai_usage_hours",
            Column::CognitiveLoad => "cognitive_load",
            Column::TaskSuccess => "task_success",
        }
    }

    /// Numeric value of this column for a record. Booleans map to 0/1.
    pub fn value(&self, record: &Record) -> Option<f64> {
        match self {
            Column::HoursCoding => Some(record.hours_coding),
            Column::CoffeeIntakeMg => Some(record.coffee_intake_mg),
            Column::Distractions => Some(record.distractions),
            Column::SleepHours => Some(record.sleep_hours),
            Column::Commits => Some(f64::from(record.commits)),
            Column::BugsReported => Some(f64::from(record.bugs_reported)),
            Column::AiUsageHours => record.ai_usage_hours,
            Column::CognitiveLoad => Some(record.cognitive_load),
            Column::TaskSuccess => Some(if record.task_success { 1.0 } else { 0.0 }),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown column: {}", s))
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Intensity of AI tool usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AiUsageCategory {
    /// Under one hour
    Low,
    /// One to two hours
    Medium,
    /// Two hours or more
    High,
}

impl AiUsageCategory {
    /// All categories, lowest usage first.
    pub const ALL: [AiUsageCategory; 3] = [
        AiUsageCategory::Low,
        AiUsageCategory::Medium,
        AiUsageCategory::High,
    ];

    /// Position in [`AiUsageCategory::ALL`].
    pub fn index(&self) -> usize {
        match self {
            AiUsageCategory::Low => 0,
            AiUsageCategory::Medium => 1,
            AiUsageCategory::High => 2,
        }
    }
}

/// Aggregated metrics for one AI-usage bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSummary {
    /// Bucket the row describes.
    #[serde(skip)]
    pub category: AiUsageCategory,
    /// Bucket label built from the thresholds in use, e.g. "Low (<1h)".
    #[serde(rename = "ai_usage_category")]
    pub label: String,
    /// Mean commits per session.
    pub avg_commits: f64,
    /// Mean bugs reported per session.
    pub avg_bugs: f64,
    /// Share of successful sessions (0.0 - 1.0).
    pub success_rate: f64,
    /// Number of sessions in the bucket.
    pub count: usize,
}

/// Descriptive statistics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: Column,
    /// Number of non-null values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

/// Square matrix of pairwise correlation coefficients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Row and column labels, in the same order for both dimensions.
    pub columns: Vec<Column>,
    /// `values[i][j]` is the coefficient between `columns[i]` and `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Look up the coefficient for a pair of columns.
    pub fn get(&self, a: Column, b: Column) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        Some(self.values[i][j])
    }

    /// Columns whose correlation is undefined (zero variance).
    pub fn undefined_columns(&self) -> Vec<Column> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(i, _)| self.values[*i][*i].is_nan())
            .map(|(_, c)| *c)
            .collect()
    }

    /// Check `M[i][j] == M[j][i]`, treating NaN as equal to NaN.
    #[cfg(test)]
    pub fn is_symmetric(&self) -> bool {
        let n = self.columns.len();
        (0..n).all(|i| {
            (0..n).all(|j| {
                let (a, b) = (self.values[i][j], self.values[j][i]);
                a == b || (a.is_nan() && b.is_nan())
            })
        })
    }
}

/// Non-fatal condition noticed while building the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    /// A derived view produced no rows.
    EmptyResult { view: String },
    /// A statistic could not be computed for a column.
    UndefinedStatistic { column: Column },
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWarning::EmptyResult { view } => write!(f, "{} returned no rows", view),
            ReportWarning::UndefinedStatistic { column } => write!(
                f,
                "correlation undefined for `{}` (zero variance)",
                column
            ),
        }
    }
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Report title.
    pub title: String,
    /// Name of the analyzed table.
    pub table: String,
    /// Where the table was loaded from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records in the dataset.
    pub total_records: usize,
    /// Records left out of the AI-usage buckets (null usage hours).
    pub unbucketed_records: usize,
    /// Duration of the analysis in seconds.
    pub duration_seconds: f64,
}

/// The complete productivity report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Descriptive statistics per column.
    pub summary: Vec<ColumnSummary>,
    /// Top sessions by commits among successful, low-bug sessions.
    pub high_performers: Vec<Record>,
    /// Metrics grouped by AI usage intensity.
    pub ai_impact: Vec<BucketSummary>,
    /// Pearson correlation across the numeric columns.
    pub correlation: CorrelationMatrix,
    /// Charts built from the dataset and derived views.
    pub charts: Vec<ChartSpec>,
    /// Non-fatal conditions found during analysis.
    pub warnings: Vec<ReportWarning>,
    /// Free-text recommendations.
    pub recommendations: Vec<String>,
}
