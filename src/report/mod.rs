//! Report presentation.
//!
//! The analysis hands tables, charts and text to a [`Presenter`]; the
//! Markdown presenter and the JSON rendering live in `generator`.

pub mod chart;
pub mod generator;
pub mod table;

pub use chart::ChartSpec;
pub use generator::{generate_json_report, generate_markdown_report};
pub use table::Table;

/// Output surface for report content.
pub trait Presenter {
    /// Display a tabular summary under a title.
    fn render_table(&mut self, table: &Table, title: &str);

    /// Display a chart.
    fn render_chart(&mut self, chart: &ChartSpec);

    /// Display Markdown text.
    fn render_text(&mut self, markdown: &str);
}
