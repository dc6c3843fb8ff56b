//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over candle sources (Yahoo Finance,
//! CSV directories, synthetic walks) so the report layer can swap them and
//! tests can mock them.

use crate::domain::{CandleSeries, SeriesError, Timeframe};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("invalid period '{0}' (expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)")]
    InvalidPeriod(String),

    #[error("no local data for {symbol} {timeframe} at {path}")]
    NoLocalData {
        symbol: String,
        timeframe: String,
        path: String,
    },

    #[error("csv error in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("invalid candle series: {0}")]
    Series(#[from] SeriesError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

/// Lookback period requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnalysisPeriod {
    OneDay,
    FiveDays,
    OneMonth,
    #[default]
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl AnalysisPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPeriod::OneDay => "1d",
            AnalysisPeriod::FiveDays => "5d",
            AnalysisPeriod::OneMonth => "1mo",
            AnalysisPeriod::ThreeMonths => "3mo",
            AnalysisPeriod::SixMonths => "6mo",
            AnalysisPeriod::OneYear => "1y",
            AnalysisPeriod::TwoYears => "2y",
            AnalysisPeriod::FiveYears => "5y",
            AnalysisPeriod::TenYears => "10y",
            AnalysisPeriod::YearToDate => "ytd",
            AnalysisPeriod::Max => "max",
        }
    }

    /// Approximate length in days; `None` for `ytd` and `max`.
    pub fn approx_days(&self) -> Option<i64> {
        match self {
            AnalysisPeriod::OneDay => Some(1),
            AnalysisPeriod::FiveDays => Some(5),
            AnalysisPeriod::OneMonth => Some(30),
            AnalysisPeriod::ThreeMonths => Some(91),
            AnalysisPeriod::SixMonths => Some(182),
            AnalysisPeriod::OneYear => Some(365),
            AnalysisPeriod::TwoYears => Some(730),
            AnalysisPeriod::FiveYears => Some(1826),
            AnalysisPeriod::TenYears => Some(3652),
            AnalysisPeriod::YearToDate | AnalysisPeriod::Max => None,
        }
    }
}

impl FromStr for AnalysisPeriod {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "1d" => AnalysisPeriod::OneDay,
            "5d" => AnalysisPeriod::FiveDays,
            "1mo" => AnalysisPeriod::OneMonth,
            "3mo" => AnalysisPeriod::ThreeMonths,
            "6mo" => AnalysisPeriod::SixMonths,
            "1y" => AnalysisPeriod::OneYear,
            "2y" => AnalysisPeriod::TwoYears,
            "5y" => AnalysisPeriod::FiveYears,
            "10y" => AnalysisPeriod::TenYears,
            "ytd" => AnalysisPeriod::YearToDate,
            "max" => AnalysisPeriod::Max,
            other => return Err(DataError::InvalidPeriod(other.to_string())),
        })
    }
}

impl TryFrom<String> for AnalysisPeriod {
    type Error = DataError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AnalysisPeriod> for String {
    fn from(p: AnalysisPeriod) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

/// Descriptive facts about a symbol. Every field is optional because
/// providers report different subsets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolProfile {
    pub company_name: Option<String>,
    pub currency: Option<String>,
    pub market_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

/// Result of a successful candle fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub series: CandleSeries,
    pub source: DataSource,
}

/// Trait for market data providers.
///
/// Providers return canonical series (sorted, deduplicated, invariant
/// checked). An empty series is a valid answer: it means the provider had no
/// candles for that window.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch candles for one symbol at one timeframe over a lookback period.
    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &Timeframe,
        period: AnalysisPeriod,
    ) -> Result<FetchResult, DataError>;

    /// Descriptive profile. Providers without one return the default.
    fn fetch_profile(&self, symbol: &str) -> Result<SymbolProfile, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}
