//! The dead-hour uplift simulation.
//!
//! A deliberately simple counterfactual: visitor counts are fixed, and only
//! spend-per-visitor could have improved to the observed fleet average. No
//! demand elasticity, no visitor-count modeling. Keep it that way.

use std::cmp::Ordering;

use crate::domain::{MetricRow, OpportunityRow, SpendField};
use crate::sim::aggregate::{Bucket, group_by_bucket};

/// Mean of per-bucket spend means: one global baseline, not per-group.
pub fn global_avg_spend(buckets: &[Bucket]) -> f64 {
    if buckets.is_empty() {
        return 0.0;
    }
    buckets.iter().map(|b| b.spend_mean()).sum::<f64>() / buckets.len() as f64
}

/// Group rows into (weekday, hour) buckets, simulate the uplift, and rank.
pub fn aggregate_and_simulate(rows: &[MetricRow], spend: SpendField) -> Vec<OpportunityRow> {
    simulate(&group_by_bucket(rows, spend))
}

/// Run the uplift simulation over pre-grouped buckets and rank the result
/// by `extra_turnover` descending (stable; ties keep encounter order).
pub fn simulate(buckets: &[Bucket]) -> Vec<OpportunityRow> {
    let avg_spend = global_avg_spend(buckets);

    let mut table: Vec<OpportunityRow> = buckets
        .iter()
        .map(|bucket| {
            let spend_mean = bucket.spend_mean();

            // Strict less-than: a bucket exactly at the average takes the
            // no-change branch. The uplift never takes a bucket below its
            // observed turnover.
            let simulated_turnover = if spend_mean < avg_spend {
                (bucket.visitors_sum * avg_spend).max(bucket.turnover_sum)
            } else {
                bucket.turnover_sum
            };

            let extra_turnover = simulated_turnover - bucket.turnover_sum;
            let growth_pct = if bucket.turnover_sum != 0.0 {
                extra_turnover / bucket.turnover_sum
            } else {
                0.0
            };

            OpportunityRow {
                weekday: bucket.weekday,
                hour: bucket.hour,
                visitors_sum: bucket.visitors_sum,
                conversion_mean: bucket.conversion_mean(),
                turnover_sum: bucket.turnover_sum,
                spend_mean,
                simulated_turnover,
                extra_turnover,
                growth_pct,
            }
        })
        .collect();

    table.sort_by(|a, b| {
        b.extra_turnover
            .partial_cmp(&a.extra_turnover)
            .unwrap_or(Ordering::Equal)
    });

    table
}
