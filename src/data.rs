//! Rate data ingestion
//!
//! - `sources`: remote and in-memory observation providers
//! - `rate_table`: date × tenor grid used between fetching and curve building
//! - `fetcher`: per-tenor fetch, rescale, fill and merge

pub mod fetcher;
pub mod rate_table;
pub mod sources;

pub use fetcher::{FetchReport, SeriesFetcher};
pub use rate_table::{RateRow, RateTable};
pub use sources::{FailingRateSource, FetchOutcome, FredClient, InMemoryRateSource, RateSource};
