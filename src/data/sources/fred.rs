//! FRED data source integration
//!
//! Provides access to the St. Louis Fed series observations endpoint, which
//! publishes the daily Treasury constant-maturity yields (DGS1MO … DGS10).

use super::{FetchOutcome, RateSource};
use crate::config::SourceConfig;
use crate::error::{CurveError, Result};
use crate::types::Observation;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Marker FRED uses for a published date without a value
const MISSING_VALUE: &str = ".";

/// FRED client bound to one API key and endpoint
pub struct FredClient {
    config: SourceConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct FredResponse {
    #[serde(default)]
    observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
struct FredObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct FredErrorResponse {
    #[serde(default)]
    error_message: Option<String>,
}

impl FredClient {
    /// Create a new FRED client
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                CurveError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn observations_url(&self) -> String {
        format!(
            "{}/series/observations",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Request a series, surfacing every failure as an error
    pub fn try_fetch(&self, series_id: &str, start: NaiveDate) -> Result<Vec<Observation>> {
        let start_text = start.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(self.observations_url())
            .query(&[
                ("series_id", series_id),
                ("api_key", self.config.api_key.as_str()),
                ("file_type", "json"),
                ("observation_start", start_text.as_str()),
            ])
            .send()
            .map_err(|e| CurveError::fetch(series_id, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CurveError::fetch(series_id, format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<FredErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error_message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(CurveError::fetch(
                series_id,
                format!("FRED returned {}: {}", status, detail),
            ));
        }

        parse_observations(&body)
    }
}

impl RateSource for FredClient {
    fn fetch_series(&self, series_id: &str, start: NaiveDate) -> FetchOutcome {
        log::debug!("Requesting {} from {}", series_id, start);
        match self.try_fetch(series_id, start) {
            Ok(observations) => FetchOutcome::from_observations(observations),
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    fn name(&self) -> &str {
        "fred"
    }
}

/// Parse a FRED observations JSON body
///
/// Time-of-day suffixes are discarded; non-numeric values (including the
/// "." marker) become missing values rather than errors.
pub fn parse_observations(body: &str) -> Result<Vec<Observation>> {
    let response: FredResponse = serde_json::from_str(body)?;

    response
        .observations
        .into_iter()
        .map(|obs| {
            let date_part = obs.date.get(..10).unwrap_or(&obs.date);
            let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
                CurveError::ParseError(format!("Invalid observation date '{}': {}", obs.date, e))
            })?;
            Ok(Observation::new(date, parse_value(&obs.value)))
        })
        .collect()
}

fn parse_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw == MISSING_VALUE {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
