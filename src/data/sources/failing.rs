//! Failing rate source - testing stub
//!
//! Every request fails. Used to check that an unreachable provider leaves
//! the curve history untouched instead of aborting the run.

use super::{FetchOutcome, RateSource};
use crate::error::CurveError;
use chrono::NaiveDate;

/// Rate source that reports a failure for every series
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRateSource {
    /// Custom failure message
    message: Option<&'static str>,
}

impl FailingRateSource {
    /// Create with the default failure message
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Create with custom failure message
    pub fn with_message(message: &'static str) -> Self {
        Self {
            message: Some(message),
        }
    }
}

impl RateSource for FailingRateSource {
    fn fetch_series(&self, series_id: &str, _start: NaiveDate) -> FetchOutcome {
        FetchOutcome::Failed(CurveError::fetch(
            series_id,
            self.message.unwrap_or("rate source unavailable"),
        ))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
