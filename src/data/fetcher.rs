//! Series fetcher - turns per-tenor remote series into one rate table
//!
//! Each series is fetched sequentially, rescaled from percent to decimal,
//! rounded to 4 places and forward-filled on its own before the columns are
//! outer-joined and forward-filled again as a whole.

use super::rate_table::RateTable;
use super::sources::{FetchOutcome, RateSource};
use crate::types::{Observation, Rate, SeriesId, Tenor};
use chrono::NaiveDate;

/// Decimal places kept after percent-to-decimal conversion
pub const RATE_DECIMALS: i32 = 4;

/// Per-series result of a fetch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Series that returned observations
    pub fetched: Vec<String>,
    /// Series that returned nothing
    pub empty: Vec<String>,
    /// Series whose request failed
    pub failed: Vec<String>,
}

impl FetchReport {
    /// True if no series produced data
    pub fn is_empty(&self) -> bool {
        self.fetched.is_empty()
    }
}

/// Convert a percent quote to a decimal rate rounded to 4 places
pub fn percent_to_rate(value: f64) -> Rate {
    let scale = 10f64.powi(RATE_DECIMALS);
    (value * 0.01 * scale).round_ties_even() / scale
}

/// Fetches a set of tenor series from one rate source
pub struct SeriesFetcher<S> {
    source: S,
}

impl<S: RateSource> SeriesFetcher<S> {
    /// Create a fetcher over a source
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch every series from `start` and merge into one table
    ///
    /// Returns an empty table when no series produced data.
    pub fn fetch_rates(&self, start: NaiveDate, series: &[(Tenor, SeriesId)]) -> RateTable {
        self.fetch_rates_with_report(start, series).0
    }

    /// Same as [`fetch_rates`](Self::fetch_rates), also reporting per-series outcomes
    pub fn fetch_rates_with_report(
        &self,
        start: NaiveDate,
        series: &[(Tenor, SeriesId)],
    ) -> (RateTable, FetchReport) {
        let mut report = FetchReport::default();
        let mut merged: Option<RateTable> = None;

        for (tenor, series_id) in series {
            let observations = match self.source.fetch_series(series_id, start) {
                FetchOutcome::Data(obs) => {
                    report.fetched.push(series_id.to_string());
                    obs
                }
                FetchOutcome::Empty => {
                    log::debug!("{} returned no observations from {}", series_id, start);
                    report.empty.push(series_id.to_string());
                    continue;
                }
                FetchOutcome::Failed(e) => {
                    log::warn!("Skipping {}: {}", series_id, e);
                    report.failed.push(series_id.to_string());
                    continue;
                }
            };

            log::debug!("{}: {} observations", series_id, observations.len());
            let column = tenor_column(*tenor, &observations);
            match merged.as_mut() {
                Some(table) => table.outer_join(column),
                None => merged = Some(column),
            }
        }

        let mut table = merged.unwrap_or_default();
        table.forward_fill();
        (table, report)
    }
}

/// One tenor's column, rescaled and forward-filled within its own series
fn tenor_column(tenor: Tenor, observations: &[Observation]) -> RateTable {
    let mut column = RateTable::from_column(
        tenor,
        observations
            .iter()
            .map(|obs| (obs.date, obs.value.map(percent_to_rate))),
    );
    column.forward_fill();
    column
}
