//! Chart specifications.
//!
//! Charts are emitted as Vega-Lite documents with their data inlined, so a
//! Markdown viewer with Vega support (or the JSON report consumer) can draw
//! them without access to the dataset.

use crate::models::{BucketSummary, CorrelationMatrix, Record};
use serde::Serialize;
use serde_json::{json, Value};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// The kinds of chart the report draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Scatter,
    GroupedBar,
    Heatmap,
}

/// A renderable chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// Height in pixels.
    pub height: u32,
    /// Full Vega-Lite document.
    pub vega_lite: Value,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: &str, height: u32, body: Value) -> Self {
        let mut vega_lite = json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": title,
            "height": height,
            "width": "container",
        });
        if let (Some(doc), Value::Object(body)) = (vega_lite.as_object_mut(), body) {
            doc.extend(body);
        }

        Self {
            kind,
            title: title.to_string(),
            height,
            vega_lite,
        }
    }

    /// Coding hours against commits, colored by success and sized by AI usage.
    pub fn coding_hours_vs_commits(records: &[Record]) -> Self {
        let values: Vec<Value> = records
            .iter()
            .map(|r| {
                json!({
                    "hours_coding": r.hours_coding,
                    "commits": r.commits,
                    "task_success": u8::from(r.task_success),
                    "ai_usage_hours": r.ai_usage_hours,
                    "bugs_reported": r.bugs_reported,
                    "cognitive_load": r.cognitive_load,
                })
            })
            .collect();

        Self::new(
            ChartKind::Scatter,
            "Coding Hours vs Commits",
            450,
            json!({
                "data": { "values": values },
                "mark": { "type": "point", "filled": true },
                "encoding": {
                    "x": { "field": "hours_coding", "type": "quantitative" },
                    "y": { "field": "commits", "type": "quantitative" },
                    "color": { "field": "task_success", "type": "quantitative" },
                    "size": { "field": "ai_usage_hours", "type": "quantitative" },
                    "tooltip": [
                        { "field": "bugs_reported", "type": "quantitative" },
                        { "field": "cognitive_load", "type": "quantitative" }
                    ]
                }
            }),
        )
    }

    /// Grouped bars of commits, success rate and bugs per usage bucket.
    pub fn ai_usage_vs_performance(buckets: &[BucketSummary]) -> Self {
        let values: Vec<Value> = buckets
            .iter()
            .map(|b| {
                json!({
                    "ai_usage_category": b.label,
                    "avg_commits": b.avg_commits,
                    "success_rate": b.success_rate,
                    "avg_bugs": b.avg_bugs,
                })
            })
            .collect();

        Self::new(
            ChartKind::GroupedBar,
            "AI Usage vs Performance Metrics",
            450,
            json!({
                "data": { "values": values },
                "transform": [{
                    "fold": ["avg_commits", "success_rate", "avg_bugs"],
                    "as": ["variable", "value"]
                }],
                "mark": "bar",
                "encoding": {
                    "x": { "field": "ai_usage_category", "type": "nominal" },
                    "xOffset": { "field": "variable" },
                    "y": { "field": "value", "type": "quantitative" },
                    "color": { "field": "variable", "type": "nominal" }
                }
            }),
        )
    }

    /// Correlation heatmap on a diverging red-blue scale.
    pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Self {
        let mut values = Vec::with_capacity(matrix.columns.len().pow(2));
        for (row, row_values) in matrix.columns.iter().zip(&matrix.values) {
            for (col, value) in matrix.columns.iter().zip(row_values) {
                values.push(json!({
                    "row": row.name(),
                    "column": col.name(),
                    "value": value,
                }));
            }
        }
        let order: Vec<&str> = matrix.columns.iter().map(|c| c.name()).collect();

        Self::new(
            ChartKind::Heatmap,
            "Correlation Matrix",
            500,
            json!({
                "data": { "values": values },
                "encoding": {
                    "x": { "field": "column", "type": "nominal", "sort": order },
                    "y": { "field": "row", "type": "nominal", "sort": order }
                },
                "layer": [
                    {
                        "mark": "rect",
                        "encoding": {
                            "color": {
                                "field": "value",
                                "type": "quantitative",
                                "scale": { "scheme": "redblue", "domain": [-1, 1] }
                            }
                        }
                    },
                    {
                        "mark": "text",
                        "encoding": {
                            "text": { "field": "value", "type": "quantitative", "format": ".2f" }
                        }
                    }
                ]
            }),
        )
    }

    /// Pretty-printed Vega-Lite JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.vega_lite).unwrap_or_else(|_| "{}".to_string())
    }
}
