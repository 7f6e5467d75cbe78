//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the normalization/simulation code stays clean and testable
//! - output changes are localized

use std::collections::HashMap;

use crate::domain::{AnalysisConfig, OpportunityRow};
use crate::report::{RowStats, worst_bucket};

/// Format the full run summary (dataset stats + baseline + worst bucket).
pub fn format_run_summary(
    stats: &RowStats,
    table: &[OpportunityRow],
    avg_spend: f64,
    config: &AnalysisConfig,
    shop_names: Option<&HashMap<i64, String>>,
) -> String {
    let mut out = String::new();

    out.push_str("=== dh - Dead-Hour Revenue Analyzer ===\n");
    out.push_str(&format!("Shops: {}\n", format_shops(&stats.shop_ids, shop_names)));
    out.push_str(&format!(
        "Rows: {} normalized, {} with usable timestamps\n",
        stats.rows_total, stats.rows_used
    ));

    match (stats.first, stats.last) {
        (Some(first), Some(last)) => {
            out.push_str(&format!("Span: {first} .. {last}\n"));
        }
        _ => out.push_str("Span: (no timestamped rows)\n"),
    }

    out.push_str(&format!(
        "Baseline: avg {} = {:.2} across {} buckets\n",
        config.spend_field.display_name(),
        avg_spend,
        table.len()
    ));

    if let Some(worst) = worst_bucket(table) {
        out.push_str(&format!(
            "Worst bucket: {} {} | visitors={:.0} conversion={:.1}% spend={:.2}\n",
            worst.weekday_name(),
            worst.hour_label(),
            worst.visitors_sum,
            worst.conversion_mean * 100.0,
            worst.spend_mean,
        ));
    }

    out.push('\n');
    out
}

/// Format the ranked opportunity table (top-N buckets by extra turnover).
pub fn format_opportunities(table: &[OpportunityRow], top_n: usize) -> String {
    if table.is_empty() {
        return "No opportunity buckets: no rows with usable timestamps.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Top revenue opportunities:\n");
    out.push_str(&format!(
        "{:<10} {:>6} {:>10} {:>10} {:>8} {:>12} {:>12} {:>12} {:>8}\n",
        "weekday", "hour", "visitors", "conv", "spend", "baseline", "simulated", "extra", "growth"
    ));
    out.push_str(&format!(
        "{:-<10} {:-<6} {:-<10} {:-<10} {:-<8} {:-<12} {:-<12} {:-<12} {:-<8}\n",
        "", "", "", "", "", "", "", "", ""
    ));

    for opp in table.iter().take(top_n.max(1)) {
        out.push_str(&format!(
            "{:<10} {:>6} {:>10.0} {:>9.1}% {:>8.2} {:>12.2} {:>12.2} {:>12.2} {:>7.1}%\n",
            opp.weekday_name(),
            opp.hour_label(),
            opp.visitors_sum,
            opp.conversion_mean * 100.0,
            opp.spend_mean,
            opp.baseline_turnover(),
            opp.simulated_turnover,
            opp.extra_turnover,
            opp.growth_pct * 100.0,
        ));
    }

    out
}

fn format_shops(shop_ids: &[i64], shop_names: Option<&HashMap<i64, String>>) -> String {
    if shop_ids.is_empty() {
        return "(none)".to_string();
    }

    let parts: Vec<String> = shop_ids
        .iter()
        .map(|id| match shop_names.and_then(|names| names.get(id)) {
            Some(name) => format!("{id} ({name})"),
            None => id.to_string(),
        })
        .collect();
    parts.join(", ")
}
