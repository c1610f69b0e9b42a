//! Markdown report generation.
//!
//! This module drives a [`Presenter`] through the report sections and
//! provides the Markdown presenter plus a JSON rendering of the report.

use super::{ChartSpec, Presenter, Table};
use crate::models::{Report, ReportMetadata, ReportWarning};
use anyhow::Result;

/// Presenter that accumulates a Markdown document.
#[derive(Debug, Default)]
pub struct MarkdownPresenter {
    output: String,
}

impl MarkdownPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the presenter and return the document.
    pub fn into_markdown(self) -> String {
        self.output
    }
}

impl Presenter for MarkdownPresenter {
    fn render_table(&mut self, table: &Table, title: &str) {
        self.output.push_str(&format!("**{}**\n\n", title));

        let header: Vec<String> = table.headers.iter().map(|h| escape_cell(h)).collect();
        self.output.push_str(&format!("| {} |\n", header.join(" | ")));
        self.output.push_str(&format!(
            "|{}\n",
            table.headers.iter().map(|_| ":---:|").collect::<String>()
        ));

        for row in &table.rows {
            let cells: Vec<String> = row.iter().map(|c| escape_cell(&c.to_string())).collect();
            self.output.push_str(&format!("| {} |\n", cells.join(" | ")));
        }

        if table.is_empty() {
            self.output.push_str("\n*No rows.*\n");
        }
        self.output.push('\n');
    }

    fn render_chart(&mut self, chart: &ChartSpec) {
        self.output.push_str(&format!("### {}\n\n", chart.title));
        self.output.push_str("```vega-lite\n");
        self.output.push_str(&chart.to_json());
        self.output.push_str("\n```\n\n");
    }

    fn render_text(&mut self, markdown: &str) {
        self.output.push_str(markdown.trim_end());
        self.output.push_str("\n\n");
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Walk the report sections in order, handing each to the presenter.
pub fn render_report<P: Presenter>(report: &Report, presenter: &mut P) {
    presenter.render_text(&format!("# {}", report.metadata.title));
    presenter.render_text(&generate_metadata_section(&report.metadata));
    presenter.render_text(&format!(
        "Total records: {}",
        report.metadata.total_records
    ));
    presenter.render_table(&Table::from_summaries(&report.summary), "Statistical Summary");

    presenter.render_text("## Top High-Performing Developers");
    presenter.render_table(&Table::from_records(&report.high_performers), "High Performers");

    presenter.render_text("## AI Usage Impact on Performance");
    presenter.render_table(&Table::from_buckets(&report.ai_impact), "AI Usage Impact");

    if !report.charts.is_empty() {
        presenter.render_text("## Visualizations");
        for chart in &report.charts {
            presenter.render_chart(chart);
        }
    }

    presenter.render_text("## Correlation Coefficients");
    presenter.render_table(&Table::from_correlation(&report.correlation), "Pearson Correlation");

    if !report.warnings.is_empty() {
        presenter.render_text(&generate_warnings_section(&report.warnings));
    }

    if !report.recommendations.is_empty() {
        presenter.render_text(&generate_recommendations_section(&report.recommendations));
    }

    presenter.render_text(&generate_footer());
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut presenter = MarkdownPresenter::new();
    render_report(report, &mut presenter);
    presenter.into_markdown()
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("- **Table:** `{}`\n", metadata.table));
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if metadata.unbucketed_records > 0 {
        section.push_str(&format!(
            "- **Records without AI usage:** {}\n",
            metadata.unbucketed_records
        ));
    }
    section.push_str(&format!(
        "- **Analysis Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_warnings_section(warnings: &[ReportWarning]) -> String {
    let mut section = String::from("## Warnings\n\n");

    for warning in warnings {
        section.push_str(&format!("- ⚠️ {}\n", warning));
    }

    section
}

/// Generate the recommendations section.
fn generate_recommendations_section(recommendations: &[String]) -> String {
    let mut section = String::from("## Recommendations\n\n");

    for rec in recommendations {
        section.push_str(&format!("- {}\n", rec));
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!(
        "---\n\n*Report generated by devpulse v{}*",
        env!("CARGO_PKG_VERSION")
    )
}

/// Generate a JSON report. Undefined statistics serialize as `null`.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
