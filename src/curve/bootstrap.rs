//! Par-curve bootstrapping
//!
//! Converts a par yield curve into discount factors at the same tenors.
//! The curve builder only depends on the [`Bootstrapper`] trait, so any
//! numerical routine (or a plain closure) can be substituted.

use crate::error::{CurveError, Result};
use crate::types::{DiscountFactor, Rate, Tenor};
use std::collections::BTreeMap;

/// Tolerance when matching a tenor to a coupon date
const GRID_EPS: f64 = 1e-9;

/// Par rates to discount factors
///
/// # Contract
///
/// Input is ordered by tenor. Output holds a factor in (0, 1] (or above 1
/// for negative rates) for every input tenor. Implementations return
/// `CurveError::Bootstrap` instead of producing non-finite or non-positive
/// factors.
pub trait Bootstrapper {
    fn discount_factors(
        &self,
        par_rates: &BTreeMap<Tenor, Rate>,
    ) -> Result<BTreeMap<Tenor, DiscountFactor>>;
}

impl<F> Bootstrapper for F
where
    F: Fn(&BTreeMap<Tenor, Rate>) -> Result<BTreeMap<Tenor, DiscountFactor>>,
{
    fn discount_factors(
        &self,
        par_rates: &BTreeMap<Tenor, Rate>,
    ) -> Result<BTreeMap<Tenor, DiscountFactor>> {
        self(par_rates)
    }
}

/// Coupon-bond bootstrapper for Treasury par yields
///
/// Par rates are interpolated linearly onto the coupon grid (flat outside
/// the quoted range), then each coupon date is solved in turn:
///
/// ```text
/// DF(t_n) = (1 - c_n/f × Σ_{i<n} DF(t_i)) / (1 + c_n/f)
/// ```
///
/// Tenors shorter than one coupon period use simple compounding
/// `1 / (1 + r × t)`. Tenors between coupon dates are log-linearly
/// interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParBootstrapper {
    /// Coupons per year
    frequency: u32,
}

impl Default for ParBootstrapper {
    fn default() -> Self {
        Self { frequency: 2 }
    }
}

impl ParBootstrapper {
    /// Semi-annual coupons, as Treasury notes pay
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom coupon frequency
    pub fn with_frequency(frequency: u32) -> Result<Self> {
        if frequency == 0 {
            return Err(CurveError::Bootstrap(
                "Coupon frequency must be at least 1".to_string(),
            ));
        }
        Ok(Self { frequency })
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    fn period(&self) -> f64 {
        1.0 / self.frequency as f64
    }

    /// Discount factors on the coupon grid up to `max_years`
    fn solve_grid(&self, pillars: &[(f64, Rate)], max_years: f64) -> Result<Vec<(f64, f64)>> {
        let period = self.period();
        let steps = ((max_years / period) - GRID_EPS).ceil().max(1.0) as usize;
        let mut grid = Vec::with_capacity(steps);
        let mut annuity = 0.0;

        for k in 1..=steps {
            let t = k as f64 * period;
            let coupon = interpolate_par(pillars, t) / self.frequency as f64;
            let df = (1.0 - coupon * annuity) / (1.0 + coupon);

            if !df.is_finite() || df <= 0.0 {
                return Err(CurveError::Bootstrap(format!(
                    "Non-positive discount factor {} at {:.4}y",
                    df, t
                )));
            }

            annuity += df;
            grid.push((t, df));
        }

        Ok(grid)
    }
}

impl Bootstrapper for ParBootstrapper {
    fn discount_factors(
        &self,
        par_rates: &BTreeMap<Tenor, Rate>,
    ) -> Result<BTreeMap<Tenor, DiscountFactor>> {
        if par_rates.is_empty() {
            return Err(CurveError::Bootstrap("Empty par curve".to_string()));
        }

        let mut pillars = Vec::with_capacity(par_rates.len());
        for (tenor, rate) in par_rates {
            let t = tenor.years();
            if !t.is_finite() || t <= 0.0 {
                return Err(CurveError::Bootstrap(format!("Invalid tenor {}", t)));
            }
            if !rate.is_finite() {
                return Err(CurveError::Bootstrap(format!(
                    "Non-finite par rate at {}y",
                    tenor
                )));
            }
            pillars.push((t, *rate));
        }

        let max_years = pillars.last().map(|(t, _)| *t).unwrap_or(0.0);
        let grid = self.solve_grid(&pillars, max_years)?;
        let period = self.period();

        let mut factors = BTreeMap::new();
        for (tenor, rate) in par_rates {
            let t = tenor.years();
            let df = if t < period - GRID_EPS {
                let df = 1.0 / (1.0 + rate * t);
                if !df.is_finite() || df <= 0.0 {
                    return Err(CurveError::Bootstrap(format!(
                        "Non-positive discount factor {} at {}y",
                        df, tenor
                    )));
                }
                df
            } else {
                grid_discount_factor(&grid, t)
            };
            factors.insert(*tenor, df);
        }

        Ok(factors)
    }
}

/// Linear par rate at `t`, flat beyond the first and last pillars
fn interpolate_par(pillars: &[(f64, Rate)], t: f64) -> Rate {
    let (first_t, first_r) = pillars[0];
    if t <= first_t {
        return first_r;
    }

    for window in pillars.windows(2) {
        let (t0, r0) = window[0];
        let (t1, r1) = window[1];
        if t <= t1 {
            return r0 + (r1 - r0) * (t - t0) / (t1 - t0);
        }
    }

    pillars[pillars.len() - 1].1
}

/// Discount factor at `t` from the solved grid (log-linear between nodes)
fn grid_discount_factor(grid: &[(f64, f64)], t: f64) -> f64 {
    let mut prev: (f64, f64) = (0.0, 1.0);
    for &(tk, dfk) in grid {
        if (t - tk).abs() < GRID_EPS {
            return dfk;
        }
        if t < tk {
            let w = (t - prev.0) / (tk - prev.0);
            return (prev.1.ln() * (1.0 - w) + dfk.ln() * w).exp();
        }
        prev = (tk, dfk);
    }
    prev.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{par_tenors, PAR_SERIES};
    use approx::assert_relative_eq;

    fn flat_curve(rate: Rate) -> BTreeMap<Tenor, Rate> {
        par_tenors().into_iter().map(|t| (t, rate)).collect()
    }

    #[test]
    fn test_six_month_factor() {
        let par: BTreeMap<Tenor, Rate> = [(Tenor::SIX_MONTHS, 0.05)].into_iter().collect();
        let dfs = ParBootstrapper::new().discount_factors(&par).unwrap();
        assert_relative_eq!(dfs[&Tenor::SIX_MONTHS], 1.0 / 1.025, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_curve_reprices_par_bonds() {
        let c = 0.04;
        let dfs = ParBootstrapper::new().discount_factors(&flat_curve(c)).unwrap();
        assert_eq!(dfs.len(), PAR_SERIES.len());

        // A flat par curve gives a flat semi-annual zero curve
        for (tenor, df) in &dfs {
            let expected = (1.0 + c / 2.0).powf(-2.0 * tenor.years());
            assert_relative_eq!(*df, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_factors_decrease_with_tenor() {
        let par: BTreeMap<Tenor, Rate> = [
            (Tenor::SIX_MONTHS, 0.053),
            (Tenor::ONE_YEAR, 0.050),
            (Tenor::TWO_YEARS, 0.048),
            (Tenor::THREE_YEARS, 0.046),
            (Tenor::FIVE_YEARS, 0.044),
            (Tenor::SEVEN_YEARS, 0.043),
            (Tenor::TEN_YEARS, 0.042),
        ]
        .into_iter()
        .collect();

        let dfs = ParBootstrapper::new().discount_factors(&par).unwrap();
        let values: Vec<f64> = dfs.values().copied().collect();
        for pair in values.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        assert!(values.iter().all(|df| *df > 0.0 && *df <= 1.0));
    }

    #[test]
    fn test_short_tenor_uses_simple_compounding() {
        let par: BTreeMap<Tenor, Rate> = [(Tenor::THREE_MONTHS, 0.052), (Tenor::ONE_YEAR, 0.05)]
            .into_iter()
            .collect();
        let dfs = ParBootstrapper::new().discount_factors(&par).unwrap();
        assert_relative_eq!(dfs[&Tenor::THREE_MONTHS], 1.0 / (1.0 + 0.052 * 0.25));
    }

    #[test]
    fn test_off_grid_tenor_interpolated() {
        let t = Tenor::new(1.25).unwrap();
        let par: BTreeMap<Tenor, Rate> = [(Tenor::ONE_YEAR, 0.05), (t, 0.05), (Tenor::TWO_YEARS, 0.05)]
            .into_iter()
            .collect();
        let dfs = ParBootstrapper::new().discount_factors(&par).unwrap();
        assert!(dfs[&t] < dfs[&Tenor::ONE_YEAR]);
        assert!(dfs[&t] > dfs[&Tenor::TWO_YEARS]);
    }

    #[test]
    fn test_grid_discount_factor_log_linear() {
        let grid = [(0.5, 0.98), (1.0, 0.95)];
        assert_eq!(grid_discount_factor(&grid, 1.0), 0.95);
        assert_relative_eq!(
            grid_discount_factor(&grid, 0.75),
            (0.98f64 * 0.95).sqrt(),
            epsilon = 1e-12
        );
        // Before the first node the curve starts from DF(0) = 1
        assert_relative_eq!(grid_discount_factor(&grid, 0.25), 0.98f64.sqrt(), epsilon = 1e-12);
        assert_eq!(grid_discount_factor(&grid, 3.0), 0.95);
    }

    #[test]
    fn test_rejects_bad_input() {
        let bootstrapper = ParBootstrapper::new();
        assert!(bootstrapper.discount_factors(&BTreeMap::new()).is_err());

        let nan: BTreeMap<Tenor, Rate> = [(Tenor::ONE_YEAR, f64::NAN)].into_iter().collect();
        assert!(bootstrapper.discount_factors(&nan).is_err());

        let absurd: BTreeMap<Tenor, Rate> = [(Tenor::ONE_YEAR, -5.0)].into_iter().collect();
        assert!(matches!(
            bootstrapper.discount_factors(&absurd),
            Err(CurveError::Bootstrap(_))
        ));

        assert!(ParBootstrapper::with_frequency(0).is_err());
    }

    #[test]
    fn test_closure_as_bootstrapper() {
        let fixed = |par: &BTreeMap<Tenor, Rate>| -> Result<BTreeMap<Tenor, DiscountFactor>> {
            Ok(par.keys().map(|t| (*t, 0.9)).collect())
        };
        let dfs = fixed.discount_factors(&flat_curve(0.03)).unwrap();
        assert!(dfs.values().all(|df| *df == 0.9));
    }
}
