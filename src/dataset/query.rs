//! The fixed set of queries the report runs.
//!
//! Each query is a small value type; running it is a pure function of the
//! records it is given.

use crate::analysis::stats::describe;
use crate::analysis::{bucket_by_ai_usage, correlation_matrix, filter_high_performers, PipelineThresholds};
use crate::models::{BucketSummary, Column, ColumnSummary, CorrelationMatrix, Record};

/// A declarative query over a table of records.
pub trait Query {
    type Output;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn execute(&self, records: &[Record]) -> Self::Output;
}

/// Top successful, low-bug sessions by commits.
#[derive(Debug, Clone, Copy)]
pub struct HighPerformers(pub PipelineThresholds);

impl Query for HighPerformers {
    type Output = Vec<Record>;

    fn name(&self) -> &'static str {
        "high_performers"
    }

    fn execute(&self, records: &[Record]) -> Vec<Record> {
        filter_high_performers(records, &self.0)
    }
}

/// Outcome averages grouped by AI usage bucket.
#[derive(Debug, Clone, Copy)]
pub struct AiUsageImpact(pub PipelineThresholds);

impl Query for AiUsageImpact {
    type Output = Vec<BucketSummary>;

    fn name(&self) -> &'static str {
        "ai_usage_impact"
    }

    fn execute(&self, records: &[Record]) -> Vec<BucketSummary> {
        bucket_by_ai_usage(records, &self.0)
    }
}

/// Pearson correlation across a projection of columns.
#[derive(Debug, Clone)]
pub struct Correlation(pub Vec<Column>);

impl Query for Correlation {
    type Output = CorrelationMatrix;

    fn name(&self) -> &'static str {
        "correlation"
    }

    fn execute(&self, records: &[Record]) -> CorrelationMatrix {
        correlation_matrix(records, &self.0)
    }
}

/// Descriptive statistics per column.
#[derive(Debug, Clone)]
pub struct Describe(pub Vec<Column>);

impl Query for Describe {
    type Output = Vec<ColumnSummary>;

    fn name(&self) -> &'static str {
        "describe"
    }

    fn execute(&self, records: &[Record]) -> Vec<ColumnSummary> {
        describe(records, &self.0)
    }
}
