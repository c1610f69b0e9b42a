//! Aggregation and correlation over the session dataset.
//!
//! Every function here is a pure view over an immutable slice of records.
//! None of them fails: an empty dataset yields empty views, and undefined
//! statistics are reported as NaN.

use crate::analysis::stats::{paired_values, pearson};
use crate::models::{AiUsageCategory, BucketSummary, Column, CorrelationMatrix, Record, ReportWarning};
use std::cmp::Reverse;

/// Thresholds that define high performers and AI-usage buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineThresholds {
    /// Minimum commits for a high performer (inclusive).
    pub min_commits: u32,
    /// Maximum bugs for a high performer (inclusive).
    pub max_bugs: u32,
    /// Number of high performers to keep.
    pub top_n: usize,
    /// Usage below this is Low.
    pub medium_usage_from: f64,
    /// Usage at or above this is High.
    pub high_usage_from: f64,
}

impl Default for PipelineThresholds {
    fn default() -> Self {
        Self {
            min_commits: 7,
            max_bugs: 1,
            top_n: 10,
            medium_usage_from: 1.0,
            high_usage_from: 2.0,
        }
    }
}

impl From<&crate::config::ThresholdsConfig> for PipelineThresholds {
    fn from(config: &crate::config::ThresholdsConfig) -> Self {
        Self {
            min_commits: config.min_commits,
            max_bugs: config.max_bugs,
            top_n: config.top_n,
            medium_usage_from: config.medium_usage_from,
            high_usage_from: config.high_usage_from,
        }
    }
}

impl PipelineThresholds {
    /// Whether a record qualifies as a high performer.
    pub fn is_high_performer(&self, record: &Record) -> bool {
        record.task_success
            && record.commits >= self.min_commits
            && record.bugs_reported <= self.max_bugs
    }

    /// Bucket for a usage value. Lower bounds are inclusive.
    pub fn categorize(&self, ai_usage_hours: f64) -> AiUsageCategory {
        if ai_usage_hours < self.medium_usage_from {
            AiUsageCategory::Low
        } else if ai_usage_hours < self.high_usage_from {
            AiUsageCategory::Medium
        } else {
            AiUsageCategory::High
        }
    }

    /// Report label for a bucket, built from the split points in use.
    ///
    /// The default splits give "Low (<1h)", "Medium (1-2h)" and "High (>2h)".
    pub fn label(&self, category: AiUsageCategory) -> String {
        let (medium, high) = (self.medium_usage_from, self.high_usage_from);
        match category {
            AiUsageCategory::Low => format!("Low (<{}h)", medium),
            AiUsageCategory::Medium => format!("Medium ({}-{}h)", medium, high),
            AiUsageCategory::High => format!("High (>{}h)", high),
        }
    }
}

/// Successful, low-bug sessions ranked by commits (highest first).
///
/// Ties keep their dataset order. At most `top_n` records are returned.
pub fn filter_high_performers(records: &[Record], thresholds: &PipelineThresholds) -> Vec<Record> {
    let mut selected: Vec<Record> = records
        .iter()
        .filter(|r| thresholds.is_high_performer(r))
        .cloned()
        .collect();

    // sort_by_key is stable
    selected.sort_by_key(|r| Reverse(r.commits));
    selected.truncate(thresholds.top_n);

    selected
}

#[derive(Default)]
struct BucketAccumulator {
    commits: u64,
    bugs: u64,
    successes: usize,
    count: usize,
}

/// Group sessions by AI usage and average their outcomes.
///
/// Records without `ai_usage_hours` are left out. Empty buckets are not
/// emitted. Rows are ordered by mean commits, highest first.
pub fn bucket_by_ai_usage(records: &[Record], thresholds: &PipelineThresholds) -> Vec<BucketSummary> {
    let mut buckets: [BucketAccumulator; 3] = Default::default();

    for record in records {
        let Some(hours) = record.ai_usage_hours else {
            continue;
        };
        let acc = &mut buckets[thresholds.categorize(hours).index()];
        acc.commits += u64::from(record.commits);
        acc.bugs += u64::from(record.bugs_reported);
        acc.successes += usize::from(record.task_success);
        acc.count += 1;
    }

    let mut summaries: Vec<BucketSummary> = AiUsageCategory::ALL
        .iter()
        .zip(buckets.iter())
        .filter(|(_, acc)| acc.count > 0)
        .map(|(category, acc)| {
            let n = acc.count as f64;
            BucketSummary {
                category: *category,
                label: thresholds.label(*category),
                avg_commits: acc.commits as f64 / n,
                avg_bugs: acc.bugs as f64 / n,
                success_rate: acc.successes as f64 / n,
                count: acc.count,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.avg_commits.total_cmp(&a.avg_commits));

    summaries
}

/// Number of records that cannot be bucketed (null usage hours).
pub fn unbucketed_count(records: &[Record]) -> usize {
    records.iter().filter(|r| r.ai_usage_hours.is_none()).count()
}

/// Pairwise Pearson correlation between the given columns.
///
/// Each pair uses the records where both values are present. A column
/// with zero variance gets NaN in its whole row and column, diagonal
/// included.
pub fn correlation_matrix(records: &[Record], columns: &[Column]) -> CorrelationMatrix {
    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        for j in i..n {
            let (xs, ys) = paired_values(records, columns[i], columns[j]);
            let r = pearson(&xs, &ys);
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    }
}

/// Collect non-fatal warnings about the derived views.
pub fn collect_warnings(
    high_performers: &[Record],
    ai_impact: &[BucketSummary],
    correlation: &CorrelationMatrix,
) -> Vec<ReportWarning> {
    let mut warnings = Vec::new();

    if high_performers.is_empty() {
        warnings.push(ReportWarning::EmptyResult {
            view: "High Performers".to_string(),
        });
    }
    if ai_impact.is_empty() {
        warnings.push(ReportWarning::EmptyResult {
            view: "AI Usage Impact".to_string(),
        });
    }
    for column in correlation.undefined_columns() {
        warnings.push(ReportWarning::UndefinedStatistic { column });
    }

    warnings
}
