//! Curve store - persisted discount factor history
//!
//! A single CSV file with header `date,<tenor>,…`, one row per date in
//! ascending order, blank cells for missing values. Every write replaces the
//! whole file through a temporary file in the same directory followed by a
//! rename, so readers never observe a partially written history.

use crate::config::StoreConfig;
use crate::curve::builder::CurveRow;
use crate::error::{CurveError, Result};
use crate::types::{Tenor, ALL_TENORS};
use chrono::{Duration, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Writer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the date column
pub const DATE_COLUMN: &str = "date";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// File-backed discount factor history
#[derive(Debug, Clone)]
pub struct CurveStore {
    path: PathBuf,
    /// Value columns, ascending
    tenors: Vec<Tenor>,
}

impl CurveStore {
    /// Store for the full Treasury tenor set at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tenors: ALL_TENORS.to_vec(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.path())
    }

    /// Store with a custom tenor set
    pub fn with_tenors(path: impl Into<PathBuf>, mut tenors: Vec<Tenor>) -> Self {
        tenors.sort();
        tenors.dedup();
        Self {
            path: path.into(),
            tenors,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tenors(&self) -> &[Tenor] {
        &self.tenors
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load every stored row, ascending by date
    ///
    /// A missing or empty file is an empty history. Columns for untracked
    /// tenors are ignored; tracked tenors absent from the file read as missing.
    pub fn read_all(&self) -> Result<Vec<CurveRow>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let date_idx = headers
            .iter()
            .position(|h| h.trim() == DATE_COLUMN)
            .ok_or_else(|| {
                CurveError::StoreError(format!(
                    "No '{}' column in {}",
                    DATE_COLUMN,
                    self.path.display()
                ))
            })?;
        let columns = self.tenor_columns(&headers, date_idx);

        let mut rows: BTreeMap<NaiveDate, CurveRow> = BTreeMap::new();
        for result in rdr.records() {
            let record = result?;
            let date_text = record
                .get(date_idx)
                .ok_or_else(|| CurveError::StoreError("Missing date".to_string()))?;
            let date = parse_date(date_text)?;

            let mut row = CurveRow::empty(date, &self.tenors);
            for (idx, tenor) in &columns {
                row.set(*tenor, parse_cell(record.get(*idx).unwrap_or(""), date, *tenor)?);
            }
            rows.insert(date, row);
        }

        Ok(rows.into_values().collect())
    }

    /// Replace the stored history with `rows`
    ///
    /// Rows are sorted by date; for a repeated date the later row wins.
    pub fn write_all(&self, rows: &[CurveRow]) -> Result<()> {
        let ordered: BTreeMap<NaiveDate, &CurveRow> = rows.iter().map(|r| (r.date, r)).collect();

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = Writer::from_writer(tmp.as_file_mut());

            let mut header = vec![DATE_COLUMN.to_string()];
            header.extend(self.tenors.iter().map(|t| t.column_name()));
            writer.write_record(&header)?;

            for row in ordered.values() {
                let mut record = vec![row.date.format(DATE_FORMAT).to_string()];
                record.extend(
                    self.tenors
                        .iter()
                        .map(|t| row.get(*t).map(|v| v.to_string()).unwrap_or_default()),
                );
                writer.write_record(&record)?;
            }
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| CurveError::IoError(e.error))?;

        log::debug!("Wrote {} rows to {}", ordered.len(), self.path.display());
        Ok(())
    }

    /// Merge `new_rows` into the stored history and rewrite it
    ///
    /// Returns the number of dates that were not stored before. A new row
    /// replaces a stored row with the same date. Nothing is written when
    /// `new_rows` is empty.
    pub fn append_merge(&self, new_rows: Vec<CurveRow>) -> Result<usize> {
        if new_rows.is_empty() {
            return Ok(0);
        }

        let mut merged: BTreeMap<NaiveDate, CurveRow> = self
            .read_all()?
            .into_iter()
            .map(|row| (row.date, row))
            .collect();

        let mut added = 0;
        for row in new_rows {
            if merged.insert(row.date, row).is_none() {
                added += 1;
            }
        }

        let rows: Vec<CurveRow> = merged.into_values().collect();
        self.write_all(&rows)?;
        Ok(added)
    }

    /// Most recent stored date
    pub fn last_update_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.read_all()?.last().map(|row| row.date))
    }

    /// First date an incremental update should request
    pub fn next_start_date(&self, epoch: NaiveDate) -> Result<NaiveDate> {
        Ok(match self.last_update_date()? {
            Some(last) => last + Duration::days(1),
            None => epoch,
        })
    }

    /// (column index, tenor) for every tracked tenor present in the header
    fn tenor_columns(&self, headers: &StringRecord, date_idx: usize) -> Vec<(usize, Tenor)> {
        headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != date_idx)
            .filter_map(|(idx, name)| match Tenor::from_column_name(name) {
                Ok(tenor) if self.tenors.contains(&tenor) => Some((idx, tenor)),
                _ => {
                    log::debug!("Ignoring column '{}' in {}", name, self.path.display());
                    None
                }
            })
            .collect()
    }
}

/// Calendar date from a stored cell, dropping any time-of-day suffix
fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|e| CurveError::ParseError(format!("Invalid date '{}': {}", text, e)))
}

fn parse_cell(text: &str, date: NaiveDate, tenor: Tenor) -> Result<Option<f64>> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    text.parse::<f64>().map(Some).map_err(|e| {
        CurveError::ParseError(format!(
            "Invalid value '{}' for {} at {}: {}",
            text, tenor, date, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn row(d: NaiveDate, df: f64) -> CurveRow {
        let mut row = CurveRow::empty(d, &ALL_TENORS);
        for tenor in ALL_TENORS.iter().skip(1) {
            row.set(*tenor, Some(df / (1.0 + tenor.years())));
        }
        row
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path().join("none.csv"));
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.last_update_date().unwrap(), None);
        assert_eq!(store.next_start_date(date(1, 1)).unwrap(), date(1, 1));
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path().join("nested").join("dfs.csv"));
        let rows = vec![row(date(1, 3), 0.99), row(date(1, 2), 0.98)];

        store.write_all(&rows).unwrap();
        let loaded = store.read_all().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], rows[1]);
        assert_eq!(loaded[1], rows[0]);
        assert_eq!(loaded[0].get(Tenor::ONE_MONTH), None);
    }

    #[test]
    fn test_header_and_blank_cells() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path().join("dfs.csv"));
        store.write_all(&[row(date(1, 2), 0.99)]).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,0.08333333333333333,0.25,0.5,1.0,2.0,3.0,5.0,7.0,10.0"
        );
        assert!(lines.next().unwrap().starts_with("2024-01-02,,"));
    }

    #[test]
    fn test_rewrite_leaves_only_store_file() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path().join("dfs.csv"));
        store.write_all(&[row(date(1, 2), 0.99)]).unwrap();
        store.append_merge(vec![row(date(1, 3), 0.98)]).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["dfs.csv".to_string()]);
        assert_eq!(store.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_append_merge_counts_new_dates() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path().join("dfs.csv"));
        store.write_all(&[row(date(1, 2), 0.99)]).unwrap();

        let added = store
            .append_merge(vec![row(date(1, 3), 0.98), row(date(1, 4), 0.97)])
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(store.last_update_date().unwrap(), Some(date(1, 4)));
        assert_eq!(store.next_start_date(date(1, 1)).unwrap(), date(1, 5));

        assert_eq!(store.append_merge(Vec::new()).unwrap(), 0);
        assert_eq!(store.read_all().unwrap().len(), 3);
    }

    #[test]
    fn test_reads_foreign_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dfs.csv");
        fs::write(
            &path,
            "1.0,date,extra,0.25\n0.95,2024-01-03 00:00:00,x,\n0.96,2024-01-02,y,0.99\n",
        )
        .unwrap();

        let rows = CurveStore::new(&path).read_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date(1, 2));
        assert_eq!(rows[0].get(Tenor::THREE_MONTHS), Some(0.99));
        assert_eq!(rows[1].get(Tenor::ONE_YEAR), Some(0.95));
        assert_eq!(rows[1].get(Tenor::THREE_MONTHS), None);
        assert_eq!(rows[1].get(Tenor::TEN_YEARS), None);
    }

    #[test]
    fn test_missing_date_column_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dfs.csv");
        fs::write(&path, "1.0,2.0\n0.9,0.8\n").unwrap();
        assert!(matches!(
            CurveStore::new(&path).read_all(),
            Err(CurveError::StoreError(_))
        ));
    }

    #[test]
    fn test_empty_file_is_empty_history() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dfs.csv");
        fs::write(&path, "").unwrap();
        assert!(CurveStore::new(&path).read_all().unwrap().is_empty());
    }
}
