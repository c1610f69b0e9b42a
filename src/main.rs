//! devpulse - Developer Productivity Analysis Report
//!
//! A CLI tool that loads a table of developer session metrics and
//! produces a Markdown or JSON report with summary statistics, high
//! performers, AI-usage impact, charts and a correlation matrix.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime or configuration error (missing file, bad schema, etc.)
//!   2 - Warnings produced and --fail-on-warning set

mod analysis;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;

use analysis::PipelineThresholds;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use dataset::csv_source::is_csv_path;
use dataset::{AiUsageImpact, Catalog, Correlation, CsvSource, Describe, HighPerformers};
use error::PipelineError;
use models::{Column, Report, ReportMetadata};
use report::ChartSpec;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("devpulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_report(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            match e.downcast_ref::<PipelineError>() {
                Some(pe) if pe.is_configuration() => error!("Dataset rejected: {:#}", e),
                _ => error!("Report failed: {:#}", e),
            }
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .devpulse.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml()?;
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the data location, thresholds and recommendations.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete report workflow. Returns exit code (0 or 2).
fn run_report(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let thresholds = PipelineThresholds::from(&config.thresholds);
    debug!("Thresholds: {:?}", thresholds);

    // Step 1: Load the dataset (schema errors are fatal here, once)
    let table = config.general.table.clone();
    let source = table_source(&args, &config);
    let mut catalog = Catalog::new(source);

    let dataset = catalog
        .load_table(&table)
        .with_context(|| format!("Failed to load table `{}`", table))?;
    debug!("Table `{}` ready", dataset.name());
    if dataset.is_empty() {
        warn!("Table `{}` has no records; every view will be empty", table);
    }
    let total_records = dataset.len();
    let origin = dataset.origin().to_string();
    let unbucketed_records = analysis::unbucketed_count(dataset.records());
    let charts_source = config
        .report
        .include_charts
        .then(|| ChartSpec::coding_hours_vs_commits(dataset.records()));

    info!("Loaded {} records from {}", total_records, origin);
    if unbucketed_records > 0 {
        warn!(
            "{} records have no ai_usage_hours and are left out of the usage buckets",
            unbucketed_records
        );
    }

    // Step 2: Run the derived views
    let columns = Column::ALL.to_vec();
    let summary = catalog.run_query(&Describe(columns.clone()), &table)?;
    let high_performers = catalog.run_query(&HighPerformers(thresholds), &table)?;
    let ai_impact = catalog.run_query(&AiUsageImpact(thresholds), &table)?;
    let correlation = catalog.run_query(&Correlation(columns), &table)?;

    info!(
        "{} high performers, {} usage buckets",
        high_performers.len(),
        ai_impact.len()
    );

    let warnings = analysis::collect_warnings(&high_performers, &ai_impact, &correlation);
    for warning in &warnings {
        warn!("{}", warning);
    }

    // Step 3: Build the report
    let charts = match charts_source {
        Some(scatter) => vec![
            scatter,
            ChartSpec::ai_usage_vs_performance(&ai_impact),
            ChartSpec::correlation_heatmap(&correlation),
        ],
        None => Vec::new(),
    };

    let metadata = ReportMetadata {
        title: config.report.title.clone(),
        table: table.clone(),
        source: origin,
        generated_at: Utc::now(),
        total_records,
        unbucketed_records,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let report = Report {
        metadata,
        summary,
        high_performers,
        ai_impact,
        correlation,
        charts,
        warnings,
        recommendations: config.report.recommendations.clone(),
    };

    // Step 4: Render and write
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    if args.stdout {
        println!("{}", output);
    } else {
        let output_path = PathBuf::from(&config.general.output);
        std::fs::write(&output_path, &output)
            .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

        if !args.quiet {
            print_summary(&report, &output_path);
        }
    }

    if args.fail_on_warning && !report.warnings.is_empty() {
        eprintln!(
            "\n⛔ {} warning(s) produced. Failing (exit code 2).",
            report.warnings.len()
        );
        return Ok(2);
    }

    Ok(0)
}

/// Print a short console summary after the report is written.
fn print_summary(report: &Report, output_path: &Path) {
    println!("\n📊 Report Summary:");
    println!("   Records: {}", report.metadata.total_records);
    println!("   High performers: {}", report.high_performers.len());
    for bucket in &report.ai_impact {
        println!(
            "   - {}: {} sessions, {:.2} avg commits, {:.0}% success",
            bucket.label,
            bucket.count,
            bucket.avg_commits,
            bucket.success_rate * 100.0
        );
    }
    if let Some(r) = report
        .correlation
        .get(Column::AiUsageHours, Column::Commits)
        .filter(|r| !r.is_nan())
    {
        println!("   AI usage vs commits correlation: {:.2}", r);
    }
    if !report.warnings.is_empty() {
        println!("   Warnings: {}", report.warnings.len());
    }
    println!(
        "\n✅ Report complete! Saved to: {}",
        output_path.display()
    );
}

/// Pick the CSV source from --data, then --data-dir / config.
fn table_source(args: &Args, config: &Config) -> CsvSource {
    match args.data {
        Some(ref path) => {
            if !is_csv_path(path) {
                warn!(
                    "{} does not have a .csv extension; reading it as CSV anyway",
                    path.display()
                );
            }
            CsvSource::file(path)
        }
        None => CsvSource::directory(&config.general.data_dir),
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
