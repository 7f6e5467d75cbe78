//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - produced by the normalizer from any historical API shape
//! - aggregated/simulated in-memory
//! - exported to CSV for spreadsheets or downstream scripts

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which average-spend metric drives the uplift simulation.
///
/// Historical API payloads carry `sales_per_visitor`, `sales_per_transaction`,
/// or both; which one is "canonical" has drifted over time, so it is a
/// configuration knob rather than a hard-coded choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SpendField {
    SalesPerVisitor,
    SalesPerTransaction,
}

impl SpendField {
    /// The metric key as it appears in API payloads.
    pub fn metric_key(self) -> &'static str {
        match self {
            SpendField::SalesPerVisitor => "sales_per_visitor",
            SpendField::SalesPerTransaction => "sales_per_transaction",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            SpendField::SalesPerVisitor => "sales per visitor",
            SpendField::SalesPerTransaction => "sales per transaction",
        }
    }

    /// Read this spend metric from a normalized row.
    pub fn of(self, row: &MetricRow) -> f64 {
        match self {
            SpendField::SalesPerVisitor => row.sales_per_visitor,
            SpendField::SalesPerTransaction => row.sales_per_transaction,
        }
    }
}

/// One normalized observation: one shop at one instant.
///
/// Numeric fields are always finite `f64`s; missing, null, or non-numeric
/// source values become `0.0` during normalization. `timestamp` is `None`
/// when the leaf's `dt` was missing or unparsable (such rows are dropped by
/// the aggregation step, not by the normalizer).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub shop_id: i64,
    pub timestamp: Option<NaiveDateTime>,
    pub count_in: f64,
    pub conversion_rate: f64,
    pub turnover: f64,
    pub sales_per_visitor: f64,
    pub sales_per_transaction: f64,
    /// Fallback bucket for metric keys not enumerated above, after the same
    /// numeric coercion. Keeps the normalizer forward-compatible with new
    /// `data_output` metrics without another enumeration rewrite.
    pub extra: BTreeMap<String, f64>,
}

impl MetricRow {
    pub fn new(shop_id: i64) -> Self {
        Self {
            shop_id,
            timestamp: None,
            count_in: 0.0,
            conversion_rate: 0.0,
            turnover: 0.0,
            sales_per_visitor: 0.0,
            sales_per_transaction: 0.0,
            extra: BTreeMap::new(),
        }
    }

    /// Weekday of the observation, when the timestamp is known.
    pub fn weekday(&self) -> Option<Weekday> {
        self.timestamp.map(|ts| ts.weekday())
    }

    /// Hour-of-day of the observation, when the timestamp is known.
    pub fn hour(&self) -> Option<u32> {
        self.timestamp.map(|ts| ts.hour())
    }
}

/// One simulated (weekday, hour) opportunity bucket.
///
/// `turnover_sum` doubles as the baseline turnover; `extra_turnover` is
/// `simulated_turnover - turnover_sum` and is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityRow {
    pub weekday: Weekday,
    pub hour: u32,
    pub visitors_sum: f64,
    pub conversion_mean: f64,
    pub turnover_sum: f64,
    /// Mean of the configured spend field across the bucket's observations.
    pub spend_mean: f64,
    pub simulated_turnover: f64,
    pub extra_turnover: f64,
    /// `extra_turnover / turnover_sum`, pinned to 0 when `turnover_sum` is 0.
    pub growth_pct: f64,
}

impl OpportunityRow {
    pub fn baseline_turnover(&self) -> f64 {
        self.turnover_sum
    }

    /// `"HH:00"` label for display and exports.
    pub fn hour_label(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    /// Canonical English weekday name.
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// Canonical English day name for a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). The API base URL is *not*
/// here on purpose: it is a secret resolved from the environment by the
/// client, never shared process-wide state.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Shops requested from the API (empty for offline file replay).
    pub shop_ids: Vec<i64>,
    /// API period token (e.g. `date`, `week`, `month`).
    pub period: String,
    /// Anchor date for `period=date`.
    pub date: Option<NaiveDate>,
    /// Interval/step requested from the API (e.g. `hour`).
    pub interval: String,
    /// Metric keys requested via repeated `data_output` parameters.
    pub metrics: Vec<String>,

    /// Spend field driving the uplift simulation.
    pub spend_field: SpendField,
    /// Show the top-N opportunity buckets.
    pub top_n: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_rows: Option<PathBuf>,
    pub export_opportunities: Option<PathBuf>,
    pub export_raw: Option<PathBuf>,
    /// Optional JSON file mapping shop id to display name.
    pub shop_names: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn weekday_and_hour_from_timestamp() {
        let mut row = MetricRow::new(7);
        assert_eq!(row.weekday(), None);
        assert_eq!(row.hour(), None);

        // 2025-08-04 is a Monday.
        row.timestamp = NaiveDate::from_ymd_opt(2025, 8, 4)
            .unwrap()
            .and_hms_opt(9, 30, 0);
        assert_eq!(row.weekday(), Some(Weekday::Mon));
        assert_eq!(row.hour(), Some(9));
    }

    #[test]
    fn hour_label_is_zero_padded() {
        let row = OpportunityRow {
            weekday: Weekday::Mon,
            hour: 9,
            visitors_sum: 0.0,
            conversion_mean: 0.0,
            turnover_sum: 0.0,
            spend_mean: 0.0,
            simulated_turnover: 0.0,
            extra_turnover: 0.0,
            growth_pct: 0.0,
        };
        assert_eq!(row.hour_label(), "09:00");
        assert_eq!(row.weekday_name(), "Monday");
        assert_eq!(row.baseline_turnover(), 0.0);
    }

    #[test]
    fn spend_field_accessors() {
        let mut row = MetricRow::new(1);
        row.sales_per_visitor = 5.0;
        row.sales_per_transaction = 12.0;
        assert_eq!(SpendField::SalesPerVisitor.of(&row), 5.0);
        assert_eq!(SpendField::SalesPerTransaction.of(&row), 12.0);
        assert_eq!(SpendField::SalesPerVisitor.metric_key(), "sales_per_visitor");
    }
}
