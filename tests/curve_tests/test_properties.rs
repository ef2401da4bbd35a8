//! Property tests for the curve pipeline

#[cfg(test)]
mod property_tests {
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use rusty_curves::curve::{Bootstrapper, CurveRow, ParBootstrapper};
    use rusty_curves::data::RateTable;
    use rusty_curves::store::CurveStore;
    use rusty_curves::types::{par_tenors, Tenor, ALL_TENORS};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn day(offset: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset as i64)
    }

    fn curve_row(d: NaiveDate, values: &[Option<f64>]) -> CurveRow {
        let mut row = CurveRow::empty(d, &ALL_TENORS);
        for (tenor, value) in ALL_TENORS.iter().zip(values) {
            row.set(*tenor, *value);
        }
        row
    }

    proptest! {
        #[test]
        fn forward_fill_carries_last_value(cells in prop::collection::vec(prop::option::of(0.0f64..0.2), 1..40)) {
            let mut table = RateTable::from_column(
                Tenor::ONE_YEAR,
                cells.iter().enumerate().map(|(i, v)| (day(i), *v)),
            );
            table.forward_fill();

            let mut last = None;
            for (i, cell) in cells.iter().enumerate() {
                if cell.is_some() {
                    last = *cell;
                }
                prop_assert_eq!(table.get(day(i), Tenor::ONE_YEAR), last);
            }
        }

        #[test]
        fn flat_par_curve_gives_decreasing_factors(rate in 0.0005f64..0.15) {
            let par: BTreeMap<Tenor, f64> = par_tenors().into_iter().map(|t| (t, rate)).collect();
            let dfs = ParBootstrapper::new().discount_factors(&par).unwrap();

            let values: Vec<f64> = dfs.values().copied().collect();
            prop_assert_eq!(values.len(), par.len());
            for pair in values.windows(2) {
                prop_assert!(pair[1] < pair[0]);
            }
            prop_assert!(values.iter().all(|df| *df > 0.0 && *df < 1.0));
        }

        #[test]
        fn append_keeps_existing_rows(
            rows in prop::collection::vec(prop::collection::vec(prop::option::of(0.5f64..1.0), 9), 1..25),
            split in 0usize..25,
        ) {
            let split = split.min(rows.len());
            let all: Vec<CurveRow> = rows
                .iter()
                .enumerate()
                .map(|(i, values)| curve_row(day(i * 2), values))
                .collect();

            let dir = tempdir().unwrap();
            let store = CurveStore::new(dir.path().join("dfs.csv"));
            store.write_all(&all[..split]).unwrap();
            let before = store.read_all().unwrap();

            let added = store.append_merge(all[split..].to_vec()).unwrap();
            let after = store.read_all().unwrap();

            prop_assert_eq!(added, all.len() - split);
            prop_assert_eq!(&after[..split], &before[..]);
            prop_assert_eq!(&after, &all);

            let dates: Vec<NaiveDate> = after.iter().map(|r| r.date).collect();
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
