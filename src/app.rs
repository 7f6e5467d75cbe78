//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches the raw analytics API response (or loads a saved one)
//! - runs normalization + aggregation + uplift simulation
//! - prints the report/bar chart
//! - writes optional exports

use std::collections::HashMap;

use clap::Parser;

use crate::cli::{Command, FetchArgs, FileArgs, ReportArgs};
use crate::data::ApiClient;
use crate::domain::AnalysisConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `dh` binary.
pub fn run() -> Result<(), AppError> {
    // We want `dh -s 12` to behave like `dh analyze -s 12`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the shorter invocation.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_fetch(args, OutputMode::Full),
        Command::Rank(args) => handle_fetch(args, OutputMode::RankOnly),
        Command::File(args) => handle_file(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RankOnly,
}

fn handle_fetch(args: FetchArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = analysis_config_from_fetch_args(&args);

    let client = ApiClient::from_env()?;
    let raw = client.fetch_metrics(&config)?;

    if let Some(path) = &config.export_raw {
        crate::io::raw::write_raw_json(path, &raw)?;
    }

    let run = pipeline::run_analysis(&raw, &config)?;
    report_run(&run, &config, mode)
}

fn handle_file(args: FileArgs) -> Result<(), AppError> {
    let config = analysis_config_from_report_args(&args.report);

    let raw = crate::io::raw::read_raw_json(&args.input)?;
    let run = pipeline::run_analysis(&raw, &config)?;
    report_run(&run, &config, OutputMode::Full)
}

fn report_run(
    run: &pipeline::RunOutput,
    config: &AnalysisConfig,
    mode: OutputMode,
) -> Result<(), AppError> {
    let shop_names: Option<HashMap<i64, String>> = match &config.shop_names {
        Some(path) => Some(crate::io::raw::load_shop_names(path)?),
        None => None,
    };

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format_run_summary(
                &run.stats,
                &run.table,
                run.avg_spend,
                config,
                shop_names.as_ref(),
            )
        );
    }

    println!("{}", crate::report::format_opportunities(&run.table, config.top_n));

    if mode == OutputMode::Full && config.plot {
        let chart = crate::plot::render_bar_chart(&run.table, config.plot_width, config.plot_height);
        if !chart.is_empty() {
            println!("{chart}");
        }
    }

    if let Some(path) = &config.export_rows {
        crate::io::export::write_rows_csv(path, &run.rows)?;
    }
    if let Some(path) = &config.export_opportunities {
        crate::io::export::write_opportunities_csv(path, &run.table)?;
    }

    Ok(())
}

pub fn analysis_config_from_fetch_args(args: &FetchArgs) -> AnalysisConfig {
    let mut config = analysis_config_from_report_args(&args.report);
    config.shop_ids = args.shops.clone();
    config.period = args.period.clone();
    config.date = args.date;
    config.interval = args.interval.clone();
    config.metrics = args.metrics.clone();
    config.export_raw = args.export_raw.clone();
    config
}

pub fn analysis_config_from_report_args(args: &ReportArgs) -> AnalysisConfig {
    AnalysisConfig {
        shop_ids: Vec::new(),
        period: "date".to_string(),
        date: None,
        interval: "hour".to_string(),
        metrics: Vec::new(),
        spend_field: args.spend_field,
        top_n: args.top,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_rows: args.export.clone(),
        export_opportunities: args.export_opportunities.clone(),
        export_raw: None,
        shop_names: args.shop_names.clone(),
    }
}

/// Rewrite argv so `dh` defaults to `dh analyze`.
///
/// Rules:
/// - `dh`                      -> `dh analyze`
/// - `dh -s 12 ...`            -> `dh analyze -s 12 ...`
/// - `dh --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "rank" | "file");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
