//! Generic tables handed to a presenter.

use crate::models::{BucketSummary, ColumnSummary, CorrelationMatrix, Record};
use std::fmt;

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) if v.is_nan() => write!(f, "NaN"),
            Cell::Float(v) => write!(f, "{:.2}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Null => write!(f, "null"),
        }
    }
}

/// Column headers plus rows of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records in dataset column order.
    pub fn from_records(records: &[Record]) -> Self {
        let headers = [
            "hours_coding",
            "commits",
            "bugs_reported",
            "ai_usage_hours",
            "task_success",
            "cognitive_load",
            "coffee_intake_mg",
            "distractions",
            "sleep_hours",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();

        let rows = records
            .iter()
            .map(|r| {
                vec![
                    Cell::Float(r.hours_coding),
                    Cell::Int(i64::from(r.commits)),
                    Cell::Int(i64::from(r.bugs_reported)),
                    r.ai_usage_hours.map_or(Cell::Null, Cell::Float),
                    Cell::Int(i64::from(r.task_success)),
                    Cell::Float(r.cognitive_load),
                    Cell::Float(r.coffee_intake_mg),
                    Cell::Float(r.distractions),
                    Cell::Float(r.sleep_hours),
                ]
            })
            .collect();

        Self { headers, rows }
    }

    /// One row per AI usage bucket.
    pub fn from_buckets(buckets: &[BucketSummary]) -> Self {
        let headers = ["ai_usage_category", "avg_commits", "avg_bugs", "success_rate", "count"]
            .iter()
            .map(|h| h.to_string())
            .collect();

        let rows = buckets
            .iter()
            .map(|b| {
                vec![
                    Cell::Text(b.label.clone()),
                    Cell::Float(b.avg_commits),
                    Cell::Float(b.avg_bugs),
                    Cell::Float(b.success_rate),
                    Cell::Int(b.count as i64),
                ]
            })
            .collect();

        Self { headers, rows }
    }

    /// Statistics as rows, columns across, like a describe() frame.
    pub fn from_summaries(summaries: &[ColumnSummary]) -> Self {
        let mut headers = vec!["statistic".to_string()];
        headers.extend(summaries.iter().map(|s| s.column.name().to_string()));

        let stats: [(&str, fn(&ColumnSummary) -> Cell); 8] = [
            ("count", |s| Cell::Int(s.count as i64)),
            ("mean", |s| Cell::Float(s.mean)),
            ("std", |s| Cell::Float(s.std)),
            ("min", |s| Cell::Float(s.min)),
            ("25%", |s| Cell::Float(s.p25)),
            ("50%", |s| Cell::Float(s.median)),
            ("75%", |s| Cell::Float(s.p75)),
            ("max", |s| Cell::Float(s.max)),
        ];

        let rows = stats
            .iter()
            .map(|(label, get)| {
                let mut row = vec![Cell::Text(label.to_string())];
                row.extend(summaries.iter().map(get));
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Square matrix with row labels in the first column.
    pub fn from_correlation(matrix: &CorrelationMatrix) -> Self {
        let mut headers = vec![String::new()];
        headers.extend(matrix.columns.iter().map(|c| c.name().to_string()));

        let rows = matrix
            .columns
            .iter()
            .zip(&matrix.values)
            .map(|(column, values)| {
                let mut row = vec![Cell::Text(column.name().to_string())];
                row.extend(values.iter().map(|v| Cell::Float(*v)));
                row
            })
            .collect();

        Self { headers, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiUsageCategory, Column};

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Int(7).to_string(), "7");
        assert_eq!(Cell::Float(0.123).to_string(), "0.12");
        assert_eq!(Cell::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(Cell::Null.to_string(), "null");
    }

    #[test]
    fn test_from_buckets() {
        let table = Table::from_buckets(&[BucketSummary {
            category: AiUsageCategory::Medium,
            label: "Medium (1-2h)".to_string(),
            avg_commits: 8.0,
            avg_bugs: 0.0,
            success_rate: 1.0,
            count: 1,
        }]);

        assert_eq!(table.headers.len(), 5);
        assert_eq!(table.rows[0][0], Cell::Text("Medium (1-2h)".to_string()));
        assert_eq!(table.rows[0][4], Cell::Int(1));
    }

    #[test]
    fn test_from_summaries_shape() {
        let summaries = crate::analysis::stats::describe(&[], &[Column::Commits, Column::SleepHours]);
        let table = Table::from_summaries(&summaries);

        assert_eq!(table.headers, vec!["statistic", "commits", "sleep_hours"]);
        assert_eq!(table.rows.len(), 8);
        assert_eq!(table.rows[0][1], Cell::Int(0));
    }

    #[test]
    fn test_from_correlation_labels_rows() {
        let matrix = CorrelationMatrix {
            columns: vec![Column::Commits, Column::BugsReported],
            values: vec![vec![1.0, -0.5], vec![-0.5, 1.0]],
        };
        let table = Table::from_correlation(&matrix);

        assert_eq!(table.rows[1][0], Cell::Text("bugs_reported".to_string()));
        assert_eq!(table.rows[1][1], Cell::Float(-0.5));
    }
}
