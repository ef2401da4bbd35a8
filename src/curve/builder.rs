//! Curve builder - par table + bill table into discount factor rows
//!
//! For each date with a complete par row, the long tenors come from the
//! bootstrapper and the short tenors come straight from bill yields via
//! `1 / (1 + r × t)`. Bill-derived values always replace bootstrapped ones.

use super::bootstrap::{Bootstrapper, ParBootstrapper};
use crate::data::rate_table::RateTable;
use crate::error::{CurveError, Result};
use crate::types::{bill_tenors, par_tenors, DiscountFactor, Rate, Tenor, ALL_TENORS};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Discount factors for one date across every tracked tenor
#[derive(Debug, Clone, PartialEq)]
pub struct CurveRow {
    pub date: NaiveDate,
    /// Every tracked tenor is present; `None` marks a missing value
    pub factors: BTreeMap<Tenor, Option<DiscountFactor>>,
}

impl CurveRow {
    /// Row with every tenor missing
    pub fn empty(date: NaiveDate, tenors: &[Tenor]) -> Self {
        Self {
            date,
            factors: tenors.iter().map(|t| (*t, None)).collect(),
        }
    }

    /// Discount factor at a tenor, if present
    pub fn get(&self, tenor: Tenor) -> Option<DiscountFactor> {
        self.factors.get(&tenor).copied().flatten()
    }

    pub fn set(&mut self, tenor: Tenor, df: Option<DiscountFactor>) {
        self.factors.insert(tenor, df);
    }

    /// Number of tenors with a value
    pub fn filled(&self) -> usize {
        self.factors.values().filter(|v| v.is_some()).count()
    }
}

/// Discount factor implied by a simple-interest bill yield
pub fn bill_discount_factor(rate: Rate, tenor: Tenor) -> DiscountFactor {
    1.0 / (1.0 + rate * tenor.years())
}

/// Builds discount factor rows from par and bill rate tables
#[derive(Debug, Clone)]
pub struct CurveBuilder<B = ParBootstrapper> {
    bootstrapper: B,
    /// Tenors that must all be present for a date to be used
    par_tenors: Vec<Tenor>,
    /// Tenors filled from bill yields
    bill_tenors: Vec<Tenor>,
    /// Output columns, ascending
    tenors: Vec<Tenor>,
}

impl CurveBuilder<ParBootstrapper> {
    /// Treasury tenor set with the coupon-bond bootstrapper
    pub fn treasury() -> Self {
        Self::new(ParBootstrapper::new())
    }
}

impl Default for CurveBuilder<ParBootstrapper> {
    fn default() -> Self {
        Self::treasury()
    }
}

impl<B: Bootstrapper> CurveBuilder<B> {
    /// Treasury tenor set with a custom bootstrapper
    pub fn new(bootstrapper: B) -> Self {
        Self {
            bootstrapper,
            par_tenors: par_tenors(),
            bill_tenors: bill_tenors(),
            tenors: ALL_TENORS.to_vec(),
        }
    }

    /// Custom tenor sets
    pub fn with_tenors(bootstrapper: B, par_tenors: Vec<Tenor>, bill_tenors: Vec<Tenor>) -> Self {
        let tenors: BTreeSet<Tenor> = par_tenors.iter().chain(bill_tenors.iter()).copied().collect();
        Self {
            bootstrapper,
            par_tenors,
            bill_tenors,
            tenors: tenors.into_iter().collect(),
        }
    }

    /// Output tenors, ascending
    pub fn tenors(&self) -> &[Tenor] {
        &self.tenors
    }

    pub fn bootstrapper(&self) -> &B {
        &self.bootstrapper
    }

    /// Build one row per usable date, ascending
    ///
    /// Dates whose par row lacks any tracked par tenor are skipped. A
    /// bootstrap failure aborts the build and names the date.
    pub fn build_discount_factors(
        &self,
        par: &RateTable,
        bill: Option<&RateTable>,
    ) -> Result<Vec<CurveRow>> {
        let mut dates: BTreeSet<NaiveDate> = par.dates().collect();
        if let Some(bill) = bill {
            dates.extend(bill.dates());
        }

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for date in dates {
            let Some(par_row) = par.row(date) else {
                skipped += 1;
                continue;
            };
            if !par.is_complete(date, &self.par_tenors) {
                skipped += 1;
                continue;
            }

            let par_rates: BTreeMap<Tenor, Rate> = self
                .par_tenors
                .iter()
                .filter_map(|t| par_row.get(t).map(|r| (*t, *r)))
                .collect();

            let mut factors = self
                .bootstrapper
                .discount_factors(&par_rates)
                .map_err(|e| CurveError::BootstrapOnDate {
                    date,
                    source: Box::new(e),
                })?;

            if let Some(bill_row) = bill.and_then(|b| b.row(date)) {
                for tenor in &self.bill_tenors {
                    if let Some(rate) = bill_row.get(tenor) {
                        factors.insert(*tenor, bill_discount_factor(*rate, *tenor));
                    }
                }
            }

            let mut row = CurveRow::empty(date, &self.tenors);
            for tenor in &self.tenors {
                row.set(*tenor, factors.get(tenor).copied());
            }
            rows.push(row);
        }

        log::debug!(
            "Built {} curve rows, skipped {} incomplete dates",
            rows.len(),
            skipped
        );
        Ok(rows)
    }
}
