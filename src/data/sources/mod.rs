//! External rate source integrations
//!
//! - FRED: St. Louis Fed economic data (Treasury constant-maturity yields)
//! - In-memory: pre-loaded observations for tests and offline runs
//! - Failing: a source whose every request fails

pub mod failing;
pub mod fred;
pub mod in_memory;

pub use failing::FailingRateSource;
pub use fred::FredClient;
pub use in_memory::InMemoryRateSource;

use crate::error::CurveError;
use crate::types::Observation;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Result of requesting a single series
///
/// Distinguishes "the provider had nothing" from "the provider call failed",
/// even though the fetch pipeline treats both as an absent series.
#[derive(Debug)]
pub enum FetchOutcome {
    /// At least one observation, unique dates, ascending
    Data(Vec<Observation>),
    /// The request succeeded but returned no observations
    Empty,
    /// Network, authentication or unknown-series failure
    Failed(CurveError),
}

impl FetchOutcome {
    /// Normalize raw observations: first value per date wins, dates ascending
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
        for obs in observations {
            by_date.entry(obs.date).or_insert(obs.value);
        }

        if by_date.is_empty() {
            return FetchOutcome::Empty;
        }

        FetchOutcome::Data(
            by_date
                .into_iter()
                .map(|(date, value)| Observation::new(date, value))
                .collect(),
        )
    }

    pub fn is_data(&self) -> bool {
        matches!(self, FetchOutcome::Data(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    /// Collapse to observations, treating failure as "no data"
    pub fn into_observations(self, series_id: &str) -> Vec<Observation> {
        match self {
            FetchOutcome::Data(observations) => observations,
            FetchOutcome::Empty => Vec::new(),
            FetchOutcome::Failed(e) => {
                log::warn!("Fetch of {} failed, treating as no data: {}", series_id, e);
                Vec::new()
            }
        }
    }
}

/// Trait for remote observation providers
pub trait RateSource {
    /// Fetch one series from `start` (inclusive) onward
    ///
    /// Implementations never panic or propagate errors; failures come back
    /// as `FetchOutcome::Failed`.
    fn fetch_series(&self, series_id: &str, start: NaiveDate) -> FetchOutcome;

    /// Get the source name
    fn name(&self) -> &str;
}

impl<S: RateSource + ?Sized> RateSource for &S {
    fn fetch_series(&self, series_id: &str, start: NaiveDate) -> FetchOutcome {
        (**self).fetch_series(series_id, start)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
