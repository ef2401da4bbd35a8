//! Zero curve service - fetch, build and persist in one call
//!
//! Runs synchronously: each series is requested in turn, the curve rows are
//! built in memory and the store file is rewritten once at the end.

use crate::config::default_epoch;
use crate::curve::bootstrap::{Bootstrapper, ParBootstrapper};
use crate::curve::builder::{CurveBuilder, CurveRow};
use crate::data::fetcher::{FetchReport, SeriesFetcher};
use crate::data::rate_table::RateTable;
use crate::data::sources::RateSource;
use crate::error::Result;
use crate::store::CurveStore;
use crate::types::{SeriesId, Tenor, BILL_SERIES, PAR_SERIES};
use chrono::NaiveDate;
use std::fmt;

/// Result of an incremental update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// New rows were appended
    Updated { start: NaiveDate, added: usize },
    /// No par series returned anything from `start`
    NoNewData { start: NaiveDate },
    /// Par data arrived but no date had a complete curve
    NoValidRows { start: NaiveDate },
}

impl UpdateOutcome {
    /// Rows added to the store
    pub fn added(&self) -> usize {
        match self {
            UpdateOutcome::Updated { added, .. } => *added,
            _ => 0,
        }
    }

    pub fn start(&self) -> NaiveDate {
        match self {
            UpdateOutcome::Updated { start, .. }
            | UpdateOutcome::NoNewData { start }
            | UpdateOutcome::NoValidRows { start } => *start,
        }
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UpdateOutcome::Updated { added, .. } => {
                write!(f, "Updated discount factors: added {} new records", added)
            }
            UpdateOutcome::NoNewData { start } => {
                write!(f, "No new data available from {}", start)
            }
            UpdateOutcome::NoValidRows { .. } => write!(f, "No valid discount factors generated"),
        }
    }
}

/// Maintains the discount factor history for one rate source and store
pub struct ZeroCurveService<S, B = ParBootstrapper> {
    source: S,
    builder: CurveBuilder<B>,
    store: CurveStore,
    epoch: NaiveDate,
    par_series: Vec<(Tenor, SeriesId)>,
    bill_series: Vec<(Tenor, SeriesId)>,
}

impl<S: RateSource> ZeroCurveService<S, ParBootstrapper> {
    /// Treasury series with the default bootstrapper
    pub fn new(source: S, store: CurveStore) -> Self {
        Self::with_builder(source, CurveBuilder::treasury(), store)
    }
}

impl<S: RateSource, B: Bootstrapper> ZeroCurveService<S, B> {
    /// Treasury series with a custom curve builder
    pub fn with_builder(source: S, builder: CurveBuilder<B>, store: CurveStore) -> Self {
        Self {
            source,
            builder,
            store,
            epoch: default_epoch(),
            par_series: PAR_SERIES.to_vec(),
            bill_series: BILL_SERIES.to_vec(),
        }
    }

    /// First date requested when the history is empty
    pub fn with_epoch(mut self, epoch: NaiveDate) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    pub fn store(&self) -> &CurveStore {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Rebuild the whole history from the epoch and overwrite the store
    ///
    /// Returns the number of rows written. When nothing could be built the
    /// existing file is left in place.
    pub fn generate_zero_curves(&self) -> Result<usize> {
        let (par, bill) = self.fetch_tables(self.epoch);
        let rows = self.build(&par, &bill)?;

        if rows.is_empty() {
            log::warn!(
                "No discount factors built from {}, keeping {}",
                self.epoch,
                self.store.path().display()
            );
            return Ok(0);
        }

        self.store.write_all(&rows)?;
        log::info!(
            "Generated {} discount factor rows into {}",
            rows.len(),
            self.store.path().display()
        );
        Ok(rows.len())
    }

    /// Append rows for dates after the last stored date
    pub fn update_zero_curves(&self) -> Result<UpdateOutcome> {
        let start = self.store.next_start_date(self.epoch)?;
        let fetcher = SeriesFetcher::new(&self.source);

        let (par, par_report) = fetcher.fetch_rates_with_report(start, &self.par_series);
        log_report("par", &par_report);
        if par.is_empty() {
            let outcome = UpdateOutcome::NoNewData { start };
            log::info!("{}", outcome);
            return Ok(outcome);
        }

        let (bill, bill_report) = fetcher.fetch_rates_with_report(start, &self.bill_series);
        log_report("bill", &bill_report);

        let rows = self.build(&par, &bill)?;
        if rows.is_empty() {
            let outcome = UpdateOutcome::NoValidRows { start };
            log::info!("{}", outcome);
            return Ok(outcome);
        }

        let added = self.store.append_merge(rows)?;
        let outcome = UpdateOutcome::Updated { start, added };
        log::info!("{}", outcome);
        Ok(outcome)
    }

    /// Same as [`update_zero_curves`](Self::update_zero_curves)
    pub fn update_rates(&self) -> Result<UpdateOutcome> {
        self.update_zero_curves()
    }

    /// Most recent stored date
    pub fn last_update_date(&self) -> Result<Option<NaiveDate>> {
        self.store.last_update_date()
    }

    fn fetch_tables(&self, start: NaiveDate) -> (RateTable, RateTable) {
        let fetcher = SeriesFetcher::new(&self.source);
        let (par, par_report) = fetcher.fetch_rates_with_report(start, &self.par_series);
        log_report("par", &par_report);
        let (bill, bill_report) = fetcher.fetch_rates_with_report(start, &self.bill_series);
        log_report("bill", &bill_report);
        (par, bill)
    }

    fn build(&self, par: &RateTable, bill: &RateTable) -> Result<Vec<CurveRow>> {
        let bill = if bill.is_empty() { None } else { Some(bill) };
        self.builder.build_discount_factors(par, bill)
    }
}

fn log_report(kind: &str, report: &FetchReport) {
    log::debug!(
        "{} series: {} fetched, {} empty, {} failed",
        kind,
        report.fetched.len(),
        report.empty.len(),
        report.failed.len()
    );
    if !report.failed.is_empty() {
        log::warn!("{} series failed: {}", kind, report.failed.join(", "));
    }
}
