//! Core types and constants

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{CurveError, Result};

/// Annualized rate as a decimal (0.05 = 5%)
pub type Rate = f64;

/// Present value of one unit received at a tenor, in (0, 1]
pub type DiscountFactor = f64;

/// Identifier of a remote observation series (e.g. "DGS10")
pub type SeriesId = &'static str;

/// Time to maturity in years
///
/// Totally ordered so it can key sorted maps. Two tenors are equal only if
/// their bit patterns are equal, which holds for the fixed constants below.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tenor(f64);

impl Tenor {
    pub const ONE_MONTH: Tenor = Tenor(1.0 / 12.0);
    pub const THREE_MONTHS: Tenor = Tenor(0.25);
    pub const SIX_MONTHS: Tenor = Tenor(0.5);
    pub const ONE_YEAR: Tenor = Tenor(1.0);
    pub const TWO_YEARS: Tenor = Tenor(2.0);
    pub const THREE_YEARS: Tenor = Tenor(3.0);
    pub const FIVE_YEARS: Tenor = Tenor(5.0);
    pub const SEVEN_YEARS: Tenor = Tenor(7.0);
    pub const TEN_YEARS: Tenor = Tenor(10.0);

    /// Create a tenor from a maturity in years
    pub fn new(years: f64) -> Result<Self> {
        if !years.is_finite() || years <= 0.0 {
            return Err(CurveError::InvalidData(format!(
                "Tenor must be positive and finite, got: {}",
                years
            )));
        }
        Ok(Tenor(years))
    }

    /// Maturity in years
    pub fn years(&self) -> f64 {
        self.0
    }

    /// Column label used in the persisted table
    ///
    /// Integral maturities keep one decimal ("1.0", "10.0"); everything
    /// else uses the shortest round-trip form ("0.5", "0.08333333333333333").
    pub fn column_name(&self) -> String {
        if self.0.fract() == 0.0 {
            format!("{:.1}", self.0)
        } else {
            format!("{}", self.0)
        }
    }

    /// Parse a column label back into a tenor
    pub fn from_column_name(name: &str) -> Result<Self> {
        let years: f64 = name
            .trim()
            .parse()
            .map_err(|e| CurveError::ParseError(format!("Invalid tenor column '{}': {}", name, e)))?;
        Tenor::new(years)
    }
}

impl TryFrom<f64> for Tenor {
    type Error = CurveError;

    fn try_from(years: f64) -> Result<Self> {
        Tenor::new(years)
    }
}

impl From<Tenor> for f64 {
    fn from(tenor: Tenor) -> f64 {
        tenor.0
    }
}

impl PartialEq for Tenor {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Tenor {}

impl PartialOrd for Tenor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tenor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Tenor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

/// Treasury constant-maturity par yields, bootstrapped into discount factors
pub const PAR_SERIES: [(Tenor, SeriesId); 7] = [
    (Tenor::SIX_MONTHS, "DGS6MO"),
    (Tenor::ONE_YEAR, "DGS1"),
    (Tenor::TWO_YEARS, "DGS2"),
    (Tenor::THREE_YEARS, "DGS3"),
    (Tenor::FIVE_YEARS, "DGS5"),
    (Tenor::SEVEN_YEARS, "DGS7"),
    (Tenor::TEN_YEARS, "DGS10"),
];

/// Short bill yields, converted to discount factors directly
pub const BILL_SERIES: [(Tenor, SeriesId); 2] = [
    (Tenor::ONE_MONTH, "DGS1MO"),
    (Tenor::THREE_MONTHS, "DGS3MO"),
];

/// Every tenor stored in the curve history, ascending
pub const ALL_TENORS: [Tenor; 9] = [
    Tenor::ONE_MONTH,
    Tenor::THREE_MONTHS,
    Tenor::SIX_MONTHS,
    Tenor::ONE_YEAR,
    Tenor::TWO_YEARS,
    Tenor::THREE_YEARS,
    Tenor::FIVE_YEARS,
    Tenor::SEVEN_YEARS,
    Tenor::TEN_YEARS,
];

/// Tenors covered by the par series
pub fn par_tenors() -> Vec<Tenor> {
    PAR_SERIES.iter().map(|(tenor, _)| *tenor).collect()
}

/// Tenors covered by the bill series
pub fn bill_tenors() -> Vec<Tenor> {
    BILL_SERIES.iter().map(|(tenor, _)| *tenor).collect()
}

/// Single dated observation from a rate source
///
/// `value` is `None` when the provider published the date without a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    /// Create a new observation
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}
