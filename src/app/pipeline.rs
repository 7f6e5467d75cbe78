//! Shared analysis pipeline used by every front-end command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! raw JSON -> normalize -> group -> simulate -> stats
//!
//! The commands then focus on where the raw JSON comes from (API vs file)
//! and on presentation (summary vs table-only).

use serde_json::Value;

use crate::domain::{AnalysisConfig, MetricRow, OpportunityRow};
use crate::error::AppError;
use crate::normalize::normalize;
use crate::report::{RowStats, compute_row_stats};
use crate::sim::aggregate::Bucket;
use crate::sim::{global_avg_spend, group_by_bucket, simulate};

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub rows: Vec<MetricRow>,
    pub buckets: Vec<Bucket>,
    /// Fleet-wide average of per-bucket spend means (the uplift baseline).
    pub avg_spend: f64,
    /// Opportunity table, ranked by extra turnover descending.
    pub table: Vec<OpportunityRow>,
    pub stats: RowStats,
}

/// Execute the full analysis pipeline over a raw API response.
pub fn run_analysis(raw: &Value, config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let rows = normalize(raw)?;
    let buckets = group_by_bucket(&rows, config.spend_field);
    let avg_spend = global_avg_spend(&buckets);
    let table = simulate(&buckets);
    let stats = compute_row_stats(&rows);

    Ok(RunOutput {
        rows,
        buckets,
        avg_spend,
        table,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpendField;
    use serde_json::json;

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            shop_ids: vec![1],
            period: "date".to_string(),
            date: None,
            interval: "hour".to_string(),
            metrics: Vec::new(),
            spend_field: SpendField::SalesPerVisitor,
            top_n: 20,
            plot: false,
            plot_width: 60,
            plot_height: 10,
            export_rows: None,
            export_opportunities: None,
            export_raw: None,
            shop_names: None,
        }
    }

    #[test]
    fn end_to_end_over_a_date_partitioned_response() {
        let raw = json!({
            "data": {
                "date_2025-08-04": {
                    "1": {
                        "dates": {
                            "09:00": { "data": {
                                "dt": "2025-08-04T09:00:00",
                                "count_in": "10", "turnover": "20",
                                "conversion_rate": "0.1", "sales_per_visitor": "2"
                            } },
                            "10:00": { "data": {
                                "dt": "2025-08-04T10:00:00",
                                "count_in": "10", "turnover": "100",
                                "conversion_rate": "0.3", "sales_per_visitor": "10"
                            } }
                        }
                    }
                }
            }
        });

        let run = run_analysis(&raw, &config()).unwrap();
        assert_eq!(run.rows.len(), 2);
        assert_eq!(run.buckets.len(), 2);
        assert_eq!(run.avg_spend, 6.0);
        assert_eq!(run.table.len(), 2);
        // The 09:00 bucket is lifted to 10 * 6 = 60 and ranked first.
        assert_eq!(run.table[0].hour, 9);
        assert_eq!(run.table[0].extra_turnover, 40.0);
        assert_eq!(run.stats.rows_used, 2);
    }

    #[test]
    fn empty_response_yields_empty_run() {
        let run = run_analysis(&json!({}), &config()).unwrap();
        assert!(run.rows.is_empty());
        assert!(run.table.is_empty());
        assert_eq!(run.avg_spend, 0.0);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let raw = json!({
            "1": { "dates": { "09:00": { "data": {
                "dt": "2025-08-04T09:00:00", "count_in": 5, "turnover": 10,
                "sales_per_visitor": 2
            } } } }
        });

        let first = run_analysis(&raw, &config()).unwrap();
        let second = run_analysis(&raw, &config()).unwrap();
        assert_eq!(first.rows, second.rows);
        assert_eq!(first.table, second.table);
    }
}
