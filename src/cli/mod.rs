//! Command-line parsing for the dead-hour analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the normalization/simulation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::SpendField;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dh", version, about = "Dead-hour revenue analyzer for shop footfall metrics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch metrics from the analytics API and print the full dead-hour report.
    Analyze(FetchArgs),
    /// Print the ranked opportunity table only (useful for scripting).
    Rank(FetchArgs),
    /// Analyze a saved raw API response JSON instead of calling the API.
    File(FileArgs),
}

/// Options for commands that call the analytics API.
#[derive(Debug, Parser, Clone)]
pub struct FetchArgs {
    /// Shop id to analyze (repeat for multiple shops).
    #[arg(short = 's', long = "shop", value_name = "ID", required = true)]
    pub shops: Vec<i64>,

    /// API period token (e.g. date, week, month).
    #[arg(long, default_value = "date")]
    pub period: String,

    /// Anchor date for the period (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Aggregation interval requested from the API.
    #[arg(long, default_value = "hour")]
    pub interval: String,

    /// Metric key requested from the API (repeatable; sent as data_output).
    #[arg(long = "metric", value_name = "KEY", default_values_t = default_metrics())]
    pub metrics: Vec<String>,

    /// Save the raw API response JSON (replayable with `dh file`).
    #[arg(long = "export-raw", value_name = "JSON")]
    pub export_raw: Option<PathBuf>,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Options for analyzing a saved raw response.
#[derive(Debug, Parser, Clone)]
pub struct FileArgs {
    /// Raw API response JSON saved with `dh analyze --export-raw`.
    #[arg(value_name = "JSON")]
    pub input: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Simulation and presentation options shared by all commands.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Spend field driving the uplift simulation.
    #[arg(long, value_enum, default_value_t = SpendField::SalesPerVisitor)]
    pub spend_field: SpendField,

    /// Show the top-N opportunity buckets.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Render an ASCII bar chart in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal bar chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Bar chart width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Bar chart height (number of bars).
    #[arg(long, default_value_t = 10)]
    pub height: usize,

    /// Export normalized rows to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the opportunity table to CSV.
    #[arg(long = "export-opportunities", value_name = "CSV")]
    pub export_opportunities: Option<PathBuf>,

    /// JSON file mapping shop id to display name.
    #[arg(long = "shop-names", value_name = "JSON")]
    pub shop_names: Option<PathBuf>,
}

fn default_metrics() -> Vec<String> {
    [
        "count_in",
        "conversion_rate",
        "turnover",
        "inside",
        "sales_per_visitor",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
