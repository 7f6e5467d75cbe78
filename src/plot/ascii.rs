//! ASCII bar chart of extra turnover per bucket.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! One horizontal `#` bar per ranked bucket, scaled to the largest
//! `extra_turnover` in view.

use crate::domain::OpportunityRow;

/// Render a horizontal bar chart for the top `height` buckets of a ranked
/// opportunity table. Returns an empty string when nothing is plottable.
pub fn render_bar_chart(table: &[OpportunityRow], width: usize, height: usize) -> String {
    let width = width.max(10);
    let rows: Vec<&OpportunityRow> = table.iter().take(height.max(1)).collect();

    let max_extra = rows
        .iter()
        .map(|o| o.extra_turnover)
        .fold(0.0_f64, f64::max);
    if rows.is_empty() || max_extra <= 0.0 {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Extra turnover by bucket (top {}):\n",
        rows.len()
    ));

    for opp in rows {
        let filled = bar_len(opp.extra_turnover, max_extra, width);
        out.push_str(&format!(
            "{:<9} {:>5} |{:<w$}| {:>10.2}\n",
            opp.weekday_name(),
            opp.hour_label(),
            "#".repeat(filled),
            opp.extra_turnover,
            w = width,
        ));
    }

    out
}

fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if !(value > 0.0) || !(max > 0.0) {
        return 0;
    }
    // Any positive value shows at least one mark.
    (((value / max) * width as f64).round() as usize).clamp(1, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn opp(hour: u32, extra: f64) -> OpportunityRow {
        OpportunityRow {
            weekday: Weekday::Mon,
            hour,
            visitors_sum: 0.0,
            conversion_mean: 0.0,
            turnover_sum: 0.0,
            spend_mean: 0.0,
            simulated_turnover: extra,
            extra_turnover: extra,
            growth_pct: 0.0,
        }
    }

    #[test]
    fn bar_lengths_scale_with_extra_turnover() {
        assert_eq!(bar_len(100.0, 100.0, 40), 40);
        assert_eq!(bar_len(50.0, 100.0, 40), 20);
        assert_eq!(bar_len(0.5, 100.0, 40), 1); // never rounds a positive bar to zero
        assert_eq!(bar_len(0.0, 100.0, 40), 0);
    }

    #[test]
    fn chart_is_limited_to_height_rows() {
        let table = vec![opp(9, 100.0), opp(10, 50.0), opp(11, 10.0)];
        let chart = render_bar_chart(&table, 40, 2);
        assert!(chart.contains("09:00"));
        assert!(chart.contains("10:00"));
        assert!(!chart.contains("11:00"));
    }

    #[test]
    fn no_chart_when_nothing_plottable() {
        assert!(render_bar_chart(&[], 40, 10).is_empty());
        assert!(render_bar_chart(&[opp(9, 0.0)], 40, 10).is_empty());
    }
}
