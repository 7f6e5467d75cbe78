//! Grouping of normalized rows into (weekday, hour) buckets.

use std::collections::HashMap;

use chrono::{Datelike, Timelike, Weekday};

use crate::domain::{MetricRow, SpendField};

/// One (weekday, hour) accumulation bucket.
///
/// Buckets are kept in first-encounter order; that order is the tie-break for
/// the final ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub weekday: Weekday,
    pub hour: u32,
    pub visitors_sum: f64,
    pub conversion_sum: f64,
    pub turnover_sum: f64,
    pub spend_sum: f64,
    pub n_obs: usize,
}

impl Bucket {
    fn new(weekday: Weekday, hour: u32) -> Self {
        Self {
            weekday,
            hour,
            visitors_sum: 0.0,
            conversion_sum: 0.0,
            turnover_sum: 0.0,
            spend_sum: 0.0,
            n_obs: 0,
        }
    }

    pub fn conversion_mean(&self) -> f64 {
        self.mean(self.conversion_sum)
    }

    /// Mean of the configured spend field across the bucket's observations.
    pub fn spend_mean(&self) -> f64 {
        self.mean(self.spend_sum)
    }

    fn mean(&self, sum: f64) -> f64 {
        if self.n_obs == 0 {
            0.0
        } else {
            sum / self.n_obs as f64
        }
    }
}

/// Group rows by (weekday, hour), dropping rows without a timestamp.
///
/// A bucket only exists once at least one observation lands in it, so empty
/// buckets are never emitted.
pub fn group_by_bucket(rows: &[MetricRow], spend: SpendField) -> Vec<Bucket> {
    let mut index: HashMap<(Weekday, u32), usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();

    for row in rows {
        let Some(ts) = row.timestamp else {
            continue;
        };
        let key = (ts.weekday(), ts.hour());

        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(Bucket::new(key.0, key.1));
            buckets.len() - 1
        });

        let bucket = &mut buckets[slot];
        bucket.visitors_sum += row.count_in;
        bucket.conversion_sum += row.conversion_rate;
        bucket.turnover_sum += row.turnover;
        bucket.spend_sum += spend.of(row);
        bucket.n_obs += 1;
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, hour: u32, count_in: f64, turnover: f64, spv: f64) -> MetricRow {
        let mut row = MetricRow::new(1);
        // August 2025: the 4th is a Monday.
        row.timestamp = NaiveDate::from_ymd_opt(2025, 8, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0);
        row.count_in = count_in;
        row.turnover = turnover;
        row.sales_per_visitor = spv;
        row.conversion_rate = 0.2;
        row
    }

    #[test]
    fn groups_by_weekday_and_hour() {
        let rows = vec![
            row(4, 9, 10.0, 50.0, 5.0),
            // Same weekday+hour one week later folds into the same bucket.
            row(11, 9, 20.0, 100.0, 7.0),
            row(4, 10, 5.0, 40.0, 8.0),
        ];

        let buckets = group_by_bucket(&rows, SpendField::SalesPerVisitor);
        assert_eq!(buckets.len(), 2);

        let monday_nine = &buckets[0];
        assert_eq!(monday_nine.weekday, Weekday::Mon);
        assert_eq!(monday_nine.hour, 9);
        assert_eq!(monday_nine.n_obs, 2);
        assert_eq!(monday_nine.visitors_sum, 30.0);
        assert_eq!(monday_nine.turnover_sum, 150.0);
        assert_eq!(monday_nine.spend_mean(), 6.0);
        assert!((monday_nine.conversion_mean() - 0.2).abs() < 1e-12);

        assert_eq!(buckets[1].hour, 10);
        assert_eq!(buckets[1].n_obs, 1);
    }

    #[test]
    fn rows_without_timestamp_are_dropped() {
        let mut no_ts = MetricRow::new(1);
        no_ts.count_in = 99.0;

        let buckets = group_by_bucket(
            &[no_ts, row(4, 9, 1.0, 2.0, 3.0)],
            SpendField::SalesPerVisitor,
        );
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].visitors_sum, 1.0);
    }

    #[test]
    fn buckets_keep_encounter_order() {
        let rows = vec![
            row(4, 15, 1.0, 1.0, 1.0),
            row(4, 9, 1.0, 1.0, 1.0),
            row(5, 12, 1.0, 1.0, 1.0),
        ];

        let hours: Vec<u32> = group_by_bucket(&rows, SpendField::SalesPerVisitor)
            .iter()
            .map(|b| b.hour)
            .collect();
        assert_eq!(hours, vec![15, 9, 12]);
    }

    #[test]
    fn empty_rows_yield_no_buckets() {
        assert!(group_by_bucket(&[], SpendField::SalesPerVisitor).is_empty());
    }
}
