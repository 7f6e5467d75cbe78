//! Export normalized rows and the opportunity table to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{MetricRow, OpportunityRow};
use crate::error::AppError;

/// Write normalized metric rows to a CSV file.
///
/// Known metrics get fixed columns; the union of fallback-bucket keys across
/// all rows is appended as extra columns (0.0 where a row lacks the key).
pub fn write_rows_csv(path: &Path, rows: &[MetricRow]) -> Result<(), AppError> {
    let mut file = create(path)?;

    let extra_keys: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| r.extra.keys().map(String::as_str))
        .collect();

    let mut header = String::from(
        "shop_id,timestamp,count_in,conversion_rate,turnover,sales_per_visitor,sales_per_transaction",
    );
    for key in &extra_keys {
        header.push(',');
        header.push_str(key);
    }
    writeln!(file, "{header}").map_err(|e| write_err(path, e))?;

    for row in rows {
        let timestamp = row
            .timestamp
            .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_default();

        let mut line = format!(
            "{},{},{:.4},{:.6},{:.4},{:.4},{:.4}",
            row.shop_id,
            timestamp,
            row.count_in,
            row.conversion_rate,
            row.turnover,
            row.sales_per_visitor,
            row.sales_per_transaction,
        );
        for key in &extra_keys {
            let value = row.extra.get(*key).copied().unwrap_or(0.0);
            line.push_str(&format!(",{value:.4}"));
        }
        writeln!(file, "{line}").map_err(|e| write_err(path, e))?;
    }

    Ok(())
}

/// Write the ranked opportunity table to a CSV file.
pub fn write_opportunities_csv(path: &Path, table: &[OpportunityRow]) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(
        file,
        "weekday,hour,visitors_sum,conversion_mean,spend_mean,baseline_turnover,simulated_turnover,extra_turnover,growth_pct"
    )
    .map_err(|e| write_err(path, e))?;

    for opp in table {
        writeln!(
            file,
            "{},{},{:.4},{:.6},{:.4},{:.4},{:.4},{:.4},{:.6}",
            opp.weekday_name(),
            opp.hour_label(),
            opp.visitors_sum,
            opp.conversion_mean,
            opp.spend_mean,
            opp.baseline_turnover(),
            opp.simulated_turnover,
            opp.extra_turnover,
            opp.growth_pct,
        )
        .map_err(|e| write_err(path, e))?;
    }

    Ok(())
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create CSV '{}': {e}", path.display())))
}

fn write_err(path: &Path, e: std::io::Error) -> AppError {
    AppError::config(format!("Failed to write CSV '{}': {e}", path.display()))
}
