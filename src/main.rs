//! Delay-Risk Pipeline - Batch CLI
//!
//! Reads an order CSV, scores every record against the trained classifier,
//! applies inclusion filters, prints KPI summaries and grouped breakdowns,
//! and writes the enriched table back out as CSV.

use anyhow::{Context, Result};
use clap::Parser;
use delay_risk_pipeline::{
    config::AppConfig, features::FeatureProjector, filter::{FilterEngine, FilterSpec},
    model::OnnxClassifier, report::MetricsAggregator, scoring::RiskScorer, tabular,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "delay-risk-pipeline", about = "Score order batches for delivery delay risk")]
struct Cli {
    /// Input CSV of order records
    #[arg(long)]
    input: PathBuf,

    /// Where to write the enriched CSV; omit to skip export
    #[arg(long)]
    output: Option<PathBuf>,

    /// Configuration file (default: config/config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// ONNX classifier path, overriding the configured one
    #[arg(long)]
    model: Option<PathBuf>,

    /// Inclusion filter clause `attr=v1,v2`; repeatable, clauses are ANDed
    #[arg(long = "filter")]
    filters: Vec<String>,

    /// Attribute to break mean probability down by; repeatable, overrides the
    /// configured list
    #[arg(long = "group-by")]
    group_by: Vec<String>,

    /// Print the summary and breakdowns as JSON instead of log lines
    #[arg(long)]
    json: bool,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    match &cli.config {
        Some(path) => AppConfig::load_from_path(path),
        None if Path::new("config/config.toml").exists() => AppConfig::load(),
        None => Ok(AppConfig::default()),
    }
}

fn init_logging(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config);

    info!("Starting delay-risk pipeline");

    // Ingest
    let file = fs::File::open(&cli.input)
        .with_context(|| format!("Failed to open input CSV {:?}", cli.input))?;
    let records = tabular::read_records(file)?;
    info!(
        records = records.len(),
        columns = records.columns().len(),
        input = %cli.input.display(),
        "Input batch loaded"
    );

    // Feature preparation
    let features = FeatureProjector::new().project(&records);

    // Classifier capability
    let model_path = cli
        .model
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.model.path));
    let classifier = OnnxClassifier::load(
        &model_path,
        config.model.feature_columns.clone(),
        config.model.onnx_threads,
    )?;

    // Scoring is all-or-nothing: a classifier fault rejects the whole batch
    // and nothing downstream runs for it.
    let scorer = RiskScorer::new(config.scoring.thresholds.clone());
    let scored = match scorer.score(&classifier, &features, &records) {
        Ok(scored) => scored,
        Err(e) => {
            error!(error = %e, "Prediction failed");
            return Err(e.into());
        }
    };

    // Filtering
    let mut spec = FilterSpec::new();
    for clause in &cli.filters {
        let (attribute, values) = FilterSpec::parse_clause(clause)?;
        if !scored.has_column(&attribute) {
            warn!(attribute = %attribute, "Filter attribute not in data, ignoring clause");
        }
        spec = spec.allow(attribute, values);
    }
    let filtered = FilterEngine::new().apply(&scored, &spec);

    // Reporting
    let aggregator = MetricsAggregator::new();
    let group_by = if cli.group_by.is_empty() {
        &config.report.group_by
    } else {
        &cli.group_by
    };

    let summary = if filtered.is_empty() {
        warn!("No records after filtering, skipping KPI summary");
        None
    } else {
        let summary = aggregator.summarize(&filtered)?;
        info!(
            total_orders = summary.total_count,
            high_risk = summary.high_risk_count,
            medium_risk = summary.medium_risk_count,
            low_risk = summary.low_risk_count,
            mean_probability = format!("{:.2}", summary.mean_probability),
            "Key business metrics"
        );
        Some(summary)
    };

    let mut breakdowns = Vec::new();
    for attribute in group_by {
        if filtered.is_empty() || !filtered.has_column(attribute) {
            info!(attribute = %attribute, "Grouping attribute absent, skipping breakdown");
            continue;
        }
        let groups = aggregator.group_mean(&filtered, attribute)?;
        for group in &groups {
            info!(
                attribute = %attribute,
                group = %group.key,
                records = group.count,
                mean_probability = format!("{:.2}", group.mean_probability),
                "Mean delay probability by group"
            );
        }
        breakdowns.push((attribute.clone(), groups));
    }

    if cli.json {
        let payload = json!({
            "summary": summary,
            "breakdowns": breakdowns
                .iter()
                .map(|(attribute, groups)| json!({ "attribute": attribute, "groups": groups }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    // Export
    if let Some(output) = &cli.output {
        let bytes = tabular::write_records(&filtered)?;
        fs::write(output, bytes)
            .with_context(|| format!("Failed to write output CSV {:?}", output))?;
        info!(records = filtered.len(), output = %output.display(), "Enriched CSV written");
    }

    Ok(())
}
