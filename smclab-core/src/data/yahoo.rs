//! Yahoo Finance data provider.
//!
//! Fetches OHLCV candles from Yahoo's v8 chart API by `range` and `interval`.
//! Handles rate limiting, retries with exponential backoff, response parsing,
//! and the circuit breaker. The symbol profile comes from the chart `meta`
//! block of a short daily request.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. The CSV provider is the offline fallback.

use super::canonicalize::{canonicalize, RawCandle};
use super::circuit_breaker::CircuitBreaker;
use super::provider::{
    AnalysisPeriod, DataError, DataSource, FetchResult, MarketDataProvider, SymbolProfile,
};
use super::resample::resample;
use crate::domain::{CandleSeries, Timeframe};
use chrono::Duration as ChronoDuration;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_price: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

/// How a timeframe is requested from Yahoo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalPlan {
    /// Interval parameter sent to the chart API.
    pub interval: String,
    /// Bucket length to aggregate the response into, if any.
    pub resample: Option<ChronoDuration>,
}

/// Map a timeframe onto a chart API interval. Yahoo has no 4h interval, so
/// 4h is fetched as 60m and resampled. Unknown labels pass through verbatim.
pub fn interval_plan(timeframe: &Timeframe) -> IntervalPlan {
    let (interval, resample) = match timeframe {
        Timeframe::Daily => ("1d", None),
        Timeframe::FourHour => ("60m", Some(ChronoDuration::hours(4))),
        Timeframe::Hourly => ("60m", None),
        Timeframe::FifteenMinute => ("15m", None),
        Timeframe::Other(label) => (label.as_str(), None),
    };
    IntervalPlan {
        interval: interval.to_string(),
        resample,
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    /// Build the chart API URL for a symbol, interval and range.
    fn chart_url(symbol: &str, interval: &str, range: &str) -> String {
        // index symbols start with '^'
        let symbol = symbol.replace('^', "%5E");
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?range={range}&interval={interval}&includePrePost=false"
        )
    }

    fn first_result(symbol: &str, resp: ChartResponse) -> Result<ChartData, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))
    }

    /// Parse the chart API response into raw rows. A result without a
    /// timestamp array means "no candles in range", not a format change.
    fn parse_rows(symbol: &str, resp: ChartResponse) -> Result<Vec<RawCandle>, DataError> {
        let data = Self::first_result(symbol, resp)?;

        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut rows = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = chrono::DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Skip rows where all OHLCV are None (holidays/halts)
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            // partial rows become NaN and are dropped by canonicalization
            rows.push(RawCandle {
                timestamp,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0.0),
            });
        }

        Ok(rows)
    }

    fn parse_profile(symbol: &str, resp: ChartResponse) -> Result<SymbolProfile, DataError> {
        let meta = Self::first_result(symbol, resp)?.meta;
        Ok(SymbolProfile {
            company_name: meta.long_name.or(meta.short_name),
            currency: meta.currency,
            market_price: meta.regular_market_price,
            market_cap: None,
            pe_ratio: None,
            fifty_two_week_high: meta.fifty_two_week_high,
            fifty_two_week_low: meta.fifty_two_week_low,
        })
    }

    /// Execute a single chart request with retry and circuit breaker logic.
    fn get_chart(&self, symbol: &str, url: &str) -> Result<ChartResponse, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                warn!(symbol, attempt, ?delay, "retrying chart request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        // IP ban
                        self.circuit_breaker.trip();
                        return Err(DataError::CircuitBreakerTripped);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.circuit_breaker.record_failure();
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(DataError::AuthenticationRequired(
                            "Yahoo Finance requires authentication".into(),
                        ));
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(DataError::SymbolNotFound {
                            symbol: symbol.to_string(),
                        });
                    }

                    if !status.is_success() {
                        self.circuit_breaker.record_failure();
                        last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                        continue;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse response for {symbol}: {e}"
                        ))
                    })?;
                    self.circuit_breaker.record_success();
                    return Ok(chart);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &Timeframe,
        period: AnalysisPeriod,
    ) -> Result<FetchResult, DataError> {
        let plan = interval_plan(timeframe);
        let url = Self::chart_url(symbol, &plan.interval, period.as_str());
        let chart = self.get_chart(symbol, &url)?;
        let rows = Self::parse_rows(symbol, chart)?;

        let (mut series, report) = canonicalize(rows)?;
        if let Some(bucket) = plan.resample {
            series = resample(&series, bucket)?;
        }
        debug!(
            symbol,
            timeframe = %timeframe,
            candles = series.len(),
            dropped_invalid = report.invalid,
            dropped_duplicates = report.duplicates,
            "fetched candles"
        );

        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe: timeframe.clone(),
            series,
            source: DataSource::YahooFinance,
        })
    }

    fn fetch_profile(&self, symbol: &str) -> Result<SymbolProfile, DataError> {
        let url = Self::chart_url(symbol, "1d", AnalysisPeriod::FiveDays.as_str());
        let chart = self.get_chart(symbol, &url)?;
        Self::parse_profile(symbol, chart)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

/// Convenience used by tests and offline tooling: parse a raw chart JSON body
/// straight into a canonical series.
pub fn parse_chart_json(symbol: &str, body: &str) -> Result<CandleSeries, DataError> {
    let chart: ChartResponse = serde_json::from_str(body)
        .map_err(|e| DataError::ResponseFormatChanged(format!("invalid chart JSON: {e}")))?;
    let rows = YahooProvider::parse_rows(symbol, chart)?;
    Ok(canonicalize(rows)?.0)
}
