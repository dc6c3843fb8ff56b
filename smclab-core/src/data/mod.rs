//! Market data: provider trait, Yahoo and CSV providers, canonicalization.

pub mod canonicalize;
pub mod circuit_breaker;
pub mod csv_import;
pub mod provider;
pub mod resample;
pub mod yahoo;

pub use canonicalize::{canonicalize, CanonicalReport, RawCandle};
pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use csv_import::CsvProvider;
pub use provider::{
    AnalysisPeriod, DataError, DataSource, FetchResult, MarketDataProvider, SymbolProfile,
};
pub use resample::resample;
pub use yahoo::{interval_plan, parse_chart_json, IntervalPlan, YahooProvider};
