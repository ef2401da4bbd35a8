//! Zero-coupon curve construction
//!
//! - `bootstrap`: par yields to discount factors
//! - `builder`: per-date curve rows combining bootstrapped and bill factors

pub mod bootstrap;
pub mod builder;

pub use bootstrap::{Bootstrapper, ParBootstrapper};
pub use builder::{bill_discount_factor, CurveBuilder, CurveRow};
