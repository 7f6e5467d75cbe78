//! Retail-analytics API client.
//!
//! The API is treated as an opaque data source: one GET with repeated query
//! parameters, returning JSON in one of several historical shapes. Decoding
//! stays untyped (`serde_json::Value`) and is handed to the normalizer, which
//! owns all shape knowledge.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::domain::AnalysisConfig;
use crate::error::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the environment (`ANALYTICS_API_URL`, `.env` honored).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("ANALYTICS_API_URL")
            .map_err(|_| AppError::config("Missing ANALYTICS_API_URL in environment (.env)."))?;
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch per-shop metrics for the configured period/interval.
    ///
    /// No retries: a failed call is reported and the run stops.
    pub fn fetch_metrics(&self, config: &AnalysisConfig) -> Result<Value, AppError> {
        let params = build_query(config);

        let resp = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .map_err(|e| AppError::data(format!("Analytics API request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data(format!(
                "Analytics API request failed with status {}.",
                resp.status()
            )));
        }

        resp.json::<Value>()
            .map_err(|e| AppError::data(format!("Failed to decode analytics API response: {e}")))
    }
}

fn build_query(config: &AnalysisConfig) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = Vec::new();

    for shop_id in &config.shop_ids {
        params.push(("data", shop_id.to_string()));
    }
    params.push(("source", "shops".to_string()));
    params.push(("period", config.period.clone()));
    if let Some(date) = config.date {
        params.push(("date", date.to_string()));
    }
    params.push(("interval", config.interval.clone()));
    for metric in &config.metrics {
        params.push(("data_output", metric.clone()));
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpendField;
    use chrono::NaiveDate;

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            shop_ids: vec![1, 2],
            period: "date".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 8, 1),
            interval: "hour".to_string(),
            metrics: vec!["count_in".to_string(), "turnover".to_string()],
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
    fn query_repeats_shop_ids_and_metrics() {
        let params = build_query(&config());

        let shops: Vec<&String> = params.iter().filter(|(k, _)| *k == "data").map(|(_, v)| v).collect();
        assert_eq!(shops, vec!["1", "2"]);

        let outputs: Vec<&String> = params
            .iter()
            .filter(|(k, _)| *k == "data_output")
            .map(|(_, v)| v)
            .collect();
        assert_eq!(outputs, vec!["count_in", "turnover"]);

        assert!(params.contains(&("period", "date".to_string())));
        assert!(params.contains(&("date", "2025-08-01".to_string())));
        assert!(params.contains(&("interval", "hour".to_string())));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("https://example.test/api/").unwrap();
        assert_eq!(client.base_url, "https://example.test/api");
    }
}
