//! Date-indexed table of rates by tenor
//!
//! Rows are kept in a `BTreeMap`, so dates are unique and ascending by
//! construction. A missing cell is simply an absent key in the row.

use crate::types::{Rate, Tenor};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// One row: tenor -> rate, only for present cells
pub type RateRow = BTreeMap<Tenor, Rate>;

/// Rates for a set of tenor columns, one row per date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    /// Known columns, ascending (a column may exist with every cell missing)
    columns: BTreeSet<Tenor>,
    rows: BTreeMap<NaiveDate, RateRow>,
}

impl RateTable {
    /// Create new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single-column table from dated values
    ///
    /// Later duplicates of a date are ignored.
    pub fn from_column<I>(tenor: Tenor, values: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<Rate>)>,
    {
        let mut table = RateTable::new();
        table.columns.insert(tenor);
        for (date, value) in values {
            if table.rows.contains_key(&date) {
                continue;
            }
            let row = table.rows.entry(date).or_default();
            if let Some(v) = value {
                row.insert(tenor, v);
            }
        }
        table
    }

    /// Set a single cell, creating the row and column if needed
    pub fn insert(&mut self, date: NaiveDate, tenor: Tenor, rate: Rate) {
        self.columns.insert(tenor);
        self.rows.entry(date).or_default().insert(tenor, rate);
    }

    /// Add a date with no values
    pub fn insert_date(&mut self, date: NaiveDate) {
        self.rows.entry(date).or_default();
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Column tenors, ascending
    pub fn columns(&self) -> impl Iterator<Item = Tenor> + '_ {
        self.columns.iter().copied()
    }

    pub fn has_column(&self, tenor: Tenor) -> bool {
        self.columns.contains(&tenor)
    }

    /// Row dates, ascending
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next_back().copied()
    }

    /// Present cells for a date
    pub fn row(&self, date: NaiveDate) -> Option<&RateRow> {
        self.rows.get(&date)
    }

    /// Single cell
    pub fn get(&self, date: NaiveDate, tenor: Tenor) -> Option<Rate> {
        self.rows.get(&date).and_then(|row| row.get(&tenor)).copied()
    }

    /// Iterate rows in date order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &RateRow)> + '_ {
        self.rows.iter().map(|(date, row)| (*date, row))
    }

    /// True if the date exists and every listed tenor has a value
    pub fn is_complete(&self, date: NaiveDate, tenors: &[Tenor]) -> bool {
        match self.rows.get(&date) {
            Some(row) => tenors.iter().all(|t| row.contains_key(t)),
            None => false,
        }
    }

    /// Outer join on date
    ///
    /// Every date from either side is kept. Where both sides have a value
    /// for the same cell, `other` wins.
    pub fn outer_join(&mut self, other: RateTable) {
        self.columns.extend(other.columns);
        for (date, row) in other.rows {
            self.rows.entry(date).or_default().extend(row);
        }
    }

    /// Carry each column's last known value forward into later missing cells
    ///
    /// Cells before a column's first value stay missing.
    pub fn forward_fill(&mut self) {
        let mut last_seen: BTreeMap<Tenor, Rate> = BTreeMap::new();
        for row in self.rows.values_mut() {
            for tenor in &self.columns {
                match row.get(tenor) {
                    Some(v) => {
                        last_seen.insert(*tenor, *v);
                    }
                    None => {
                        if let Some(v) = last_seen.get(tenor) {
                            row.insert(*tenor, *v);
                        }
                    }
                }
            }
        }
    }
}
