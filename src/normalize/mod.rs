//! Raw API response normalization.
//!
//! The analytics API has shipped several response shapes over the years and
//! carries no schema version tag, so the shape must be inferred structurally.
//! This module turns any of the known shapes into a flat list of
//! [`MetricRow`]s.
//!
//! Design goals:
//! - **Tagged-variant dispatch** on shape (new historical shapes slot in
//!   without touching existing matchers)
//! - **Partial-result policy**: malformed leaves are skipped, never fatal —
//!   a smaller valid table beats a hard failure on one bad record
//! - **Hard failure** only on a non-integer shop key, which signals an
//!   unrecoverable schema break
//! - **No fitting/aggregation logic here**

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::domain::MetricRow;
use crate::error::AppError;

/// Label prefix marking a date-partition bucket key (e.g. `date_2025-08-01`).
const DATE_BUCKET_PREFIX: &str = "date_";

/// Structurally detected top-level response shape, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A JSON array of homogeneous response objects (degenerate historical
    /// variant); each element is normalized recursively.
    Sequence,
    /// A top-level `data` envelope whose children are `date_*` buckets and/or
    /// shop ids (the date-partitioned and envelope-only variants).
    Enveloped,
    /// The top-level object is the shop-keyed mapping itself (oldest variant).
    Bare,
}

/// Detect the top-level shape of a raw response.
pub fn detect_shape(raw: &Value) -> Shape {
    match raw {
        Value::Array(_) => Shape::Sequence,
        Value::Object(map) if map.contains_key("data") => Shape::Enveloped,
        _ => Shape::Bare,
    }
}

/// Normalize a raw JSON response into flat per-timestamp metric rows.
///
/// Rows come out in encounter order; callers that need time order must sort
/// explicitly. Empty input, or input matching none of the known shapes,
/// yields an empty vector rather than an error.
pub fn normalize(raw: &Value) -> Result<Vec<MetricRow>, AppError> {
    let mut rows = Vec::new();
    collect(raw, &mut rows)?;
    Ok(rows)
}

fn collect(raw: &Value, rows: &mut Vec<MetricRow>) -> Result<(), AppError> {
    match detect_shape(raw) {
        Shape::Sequence => {
            if let Value::Array(items) = raw {
                for item in items {
                    collect(item, rows)?;
                }
            }
        }
        Shape::Enveloped => {
            if let Some(inner) = raw.get("data") {
                walk_shop_map(inner, rows)?;
            }
        }
        Shape::Bare => walk_shop_map(raw, rows)?,
    }
    Ok(())
}

/// Walk a shop-keyed mapping, dispatching each key on structure.
///
/// `date_*` keys are date-partition buckets wrapping another shop map and are
/// descended into; every other key is a shop id. Mixed responses interleave
/// both at the same level, so dispatch is per key, not per mapping. The
/// bucket label itself only navigates — each leaf carries its own `dt`.
fn walk_shop_map(value: &Value, rows: &mut Vec<MetricRow>) -> Result<(), AppError> {
    let Value::Object(map) = value else {
        return Ok(());
    };

    for (key, entry) in map {
        if key.starts_with(DATE_BUCKET_PREFIX) {
            walk_shop_map(entry, rows)?;
        } else {
            let shop_id = parse_shop_id(key)?;
            collect_shop_rows(shop_id, entry, rows);
        }
    }
    Ok(())
}

fn parse_shop_id(key: &str) -> Result<i64, AppError> {
    key.trim()
        .parse::<i64>()
        .map_err(|_| AppError::data(format!("Invalid shop id key '{key}' in API response.")))
}

fn collect_shop_rows(shop_id: i64, shop: &Value, rows: &mut Vec<MetricRow>) {
    // Shops without a `dates` mapping contribute zero rows.
    let Some(Value::Object(dates)) = shop.get("dates") else {
        return;
    };

    for entry in dates.values() {
        // Leaf entries without a `data` sub-object are skipped.
        let Some(Value::Object(data)) = entry.get("data") else {
            continue;
        };
        rows.push(row_from_leaf(shop_id, data));
    }
}

fn row_from_leaf(shop_id: i64, data: &Map<String, Value>) -> MetricRow {
    let mut row = MetricRow::new(shop_id);

    for (key, value) in data {
        match key.as_str() {
            "dt" => row.timestamp = value.as_str().and_then(parse_timestamp),
            "count_in" => row.count_in = coerce_number(value),
            "conversion_rate" => row.conversion_rate = coerce_number(value),
            "turnover" => row.turnover = coerce_number(value),
            "sales_per_visitor" => row.sales_per_visitor = coerce_number(value),
            "sales_per_transaction" => row.sales_per_transaction = coerce_number(value),
            other => {
                row.extra.insert(other.to_string(), coerce_number(value));
            }
        }
    }

    row
}

/// Coerce a JSON metric value to `f64`.
///
/// Numbers pass through, numeric-looking strings are parsed, and everything
/// else (null, booleans, nested values, non-numeric strings) becomes `0.0`.
/// The result is always finite.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Permissive timestamp parsing over the formats seen in production payloads.
///
/// Tried in order: RFC 3339 (offset dropped), `T`- and space-separated
/// date-times with and without seconds, then bare dates (midnight). Returns
/// `None` when nothing matches; the caller keeps the row and lets the
/// aggregation step drop it.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}
