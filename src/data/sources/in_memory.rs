//! In-memory rate source implementation
//!
//! Serves pre-loaded observations keyed by series id. Useful for tests and
//! for replaying previously downloaded data without network access.
//!
//! # Example
//! ```
//! use rusty_curves::data::sources::{InMemoryRateSource, RateSource};
//! use chrono::NaiveDate;
//!
//! let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let mut source = InMemoryRateSource::new();
//! source.add_observation("DGS10", d, 3.95);
//!
//! let obs = source.fetch_series("DGS10", d).into_observations("DGS10");
//! assert_eq!(obs.len(), 1);
//! ```

use super::{FetchOutcome, RateSource};
use crate::error::CurveError;
use crate::types::Observation;
use chrono::NaiveDate;
use hashbrown::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory observation storage
#[derive(Debug, Default)]
pub struct InMemoryRateSource {
    /// series id -> observations, in insertion order
    series: HashMap<String, Vec<Observation>>,
    /// Series whose requests fail
    failing: HashSet<String>,
    /// Every (series id, start) requested, in order
    requests: Mutex<Vec<(String, NaiveDate)>>,
}

impl InMemoryRateSource {
    /// Create new empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single observation
    pub fn add_observation(&mut self, series_id: &str, date: NaiveDate, value: f64) {
        self.push(series_id, Observation::new(date, Some(value)));
    }

    /// Add a published date without a value
    pub fn add_missing(&mut self, series_id: &str, date: NaiveDate) {
        self.push(series_id, Observation::new(date, None));
    }

    /// Add many observations for one series
    pub fn add_series<I>(&mut self, series_id: &str, observations: I)
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        for (date, value) in observations {
            self.add_observation(series_id, date, value);
        }
    }

    /// Make every request for this series fail
    pub fn fail_series(&mut self, series_id: &str) {
        self.failing.insert(series_id.to_string());
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<(String, NaiveDate)> {
        self.requests
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn push(&mut self, series_id: &str, observation: Observation) {
        self.series
            .entry(series_id.to_string())
            .or_default()
            .push(observation);
    }
}

impl RateSource for InMemoryRateSource {
    fn fetch_series(&self, series_id: &str, start: NaiveDate) -> FetchOutcome {
        if let Ok(mut log) = self.requests.lock() {
            log.push((series_id.to_string(), start));
        }

        if self.failing.contains(series_id) {
            return FetchOutcome::Failed(CurveError::fetch(series_id, "configured to fail"));
        }

        let observations: Vec<Observation> = self
            .series
            .get(series_id)
            .map(|obs| obs.iter().filter(|o| o.date >= start).copied().collect())
            .unwrap_or_default();

        FetchOutcome::from_observations(observations)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_filters_by_start_date() {
        let mut source = InMemoryRateSource::new();
        source.add_series("DGS1", vec![(date(2), 5.0), (date(3), 5.1), (date(4), 5.2)]);

        let obs = source.fetch_series("DGS1", date(3)).into_observations("DGS1");
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].date, date(3));
    }

    #[test]
    fn test_unknown_series_is_empty() {
        let source = InMemoryRateSource::new();
        assert!(matches!(
            source.fetch_series("NOPE", date(1)),
            FetchOutcome::Empty
        ));
    }

    #[test]
    fn test_failing_series_and_request_log() {
        let mut source = InMemoryRateSource::new();
        source.add_observation("DGS2", date(2), 4.8);
        source.fail_series("DGS2");

        assert!(source.fetch_series("DGS2", date(1)).is_failed());
        assert_eq!(source.requests(), vec![("DGS2".to_string(), date(1))]);
    }
}
