//! # rusty-curves
//!
//! Maintains a history of risk-free discount factors built from U.S.
//! Treasury par yield curves.
//!
//! Daily par yields are fetched per tenor from FRED, aligned by date,
//! bootstrapped into zero-coupon discount factors, spliced with bill-derived
//! factors at the short end, and merged into a CSV history.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rusty_curves::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let client = FredClient::new(SourceConfig::from_env()?)?;
//!     let store = CurveStore::new("rates/processed/discount_factors.csv");
//!     let service = ZeroCurveService::new(client, store);
//!
//!     let outcome = service.update_zero_curves()?;
//!     println!("{}", outcome);
//!     println!("Last update: {:?}", service.last_update_date()?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod curve;
pub mod data;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::{Settings, SourceConfig, StoreConfig};
    pub use crate::curve::{Bootstrapper, CurveBuilder, CurveRow, ParBootstrapper};
    pub use crate::data::{
        FetchOutcome, FredClient, InMemoryRateSource, RateSource, RateTable, SeriesFetcher,
    };
    pub use crate::error::{CurveError, Result};
    pub use crate::service::{UpdateOutcome, ZeroCurveService};
    pub use crate::store::CurveStore;
    pub use crate::types::*;
}
