//! Reporting utilities: dataset stats, worst-bucket lookup, formatted output.

mod format;

pub use format::{format_opportunities, format_run_summary};

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::domain::{MetricRow, OpportunityRow};

/// Summary stats about the normalized rows in a run.
#[derive(Debug, Clone)]
pub struct RowStats {
    pub rows_total: usize,
    /// Rows with a usable timestamp (only these enter the aggregation).
    pub rows_used: usize,
    /// Distinct shop ids observed, in ascending order.
    pub shop_ids: Vec<i64>,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
}

/// Compute summary stats over normalized rows.
pub fn compute_row_stats(rows: &[MetricRow]) -> RowStats {
    let shop_ids: BTreeSet<i64> = rows.iter().map(|r| r.shop_id).collect();
    let timestamps: Vec<NaiveDateTime> = rows.iter().filter_map(|r| r.timestamp).collect();

    RowStats {
        rows_total: rows.len(),
        rows_used: timestamps.len(),
        shop_ids: shop_ids.into_iter().collect(),
        first: timestamps.iter().min().copied(),
        last: timestamps.iter().max().copied(),
    }
}

/// The single worst-performing bucket: lowest spend mean across the table.
pub fn worst_bucket(table: &[OpportunityRow]) -> Option<&OpportunityRow> {
    table.iter().min_by(|a, b| {
        a.spend_mean
            .partial_cmp(&b.spend_mean)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn stats_track_timestamps_and_shops() {
        let mut a = MetricRow::new(2);
        a.timestamp = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(9, 0, 0);
        let mut b = MetricRow::new(1);
        b.timestamp = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(12, 0, 0);
        let c = MetricRow::new(1); // no timestamp

        let stats = compute_row_stats(&[a, b, c]);
        assert_eq!(stats.rows_total, 3);
        assert_eq!(stats.rows_used, 2);
        assert_eq!(stats.shop_ids, vec![1, 2]);
        assert_eq!(
            stats.first,
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(9, 0, 0)
        );
        assert_eq!(
            stats.last,
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(12, 0, 0)
        );
    }

    #[test]
    fn stats_on_empty_rows() {
        let stats = compute_row_stats(&[]);
        assert_eq!(stats.rows_total, 0);
        assert_eq!(stats.rows_used, 0);
        assert!(stats.shop_ids.is_empty());
        assert_eq!(stats.first, None);
    }

    #[test]
    fn worst_bucket_is_lowest_spend_mean() {
        use chrono::Weekday;
        let opp = |hour: u32, spend_mean: f64| OpportunityRow {
            weekday: Weekday::Mon,
            hour,
            visitors_sum: 0.0,
            conversion_mean: 0.0,
            turnover_sum: 0.0,
            spend_mean,
            simulated_turnover: 0.0,
            extra_turnover: 0.0,
            growth_pct: 0.0,
        };

        let table = vec![opp(9, 4.0), opp(10, 1.5), opp(11, 8.0)];
        assert_eq!(worst_bucket(&table).unwrap().hour, 10);
        assert!(worst_bucket(&[]).is_none());
    }
}
