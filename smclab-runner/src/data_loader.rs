//! Provider selection for a report run.
//!
//! Resolves the data source a run should use:
//! 1. `--csv-dir DIR` → read local CSV files
//! 2. `--synthetic` → deterministic random walk (tagged as synthetic)
//! 3. otherwise → Yahoo Finance with retries and the circuit breaker
//!
//! Synthetic data is a developer-only mode. Reports built on it carry
//! `data_source = "synthetic"` so they are never mistaken for market data.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smclab_core::data::{
    AnalysisPeriod, CircuitBreaker, CsvProvider, DataError, DataSource, FetchResult,
    MarketDataProvider, SymbolProfile, YahooProvider,
};
use smclab_core::domain::{Candle, CandleSeries, Timeframe};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ProviderConfig;

/// Upper bound on generated candles per series.
const MAX_SYNTHETIC_CANDLES: usize = 2_000;

/// Which provider a run reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderChoice {
    Yahoo,
    Csv(PathBuf),
    Synthetic,
}

/// Build the provider for `choice`.
pub fn build_provider(
    choice: &ProviderChoice,
    config: &ProviderConfig,
) -> Result<Box<dyn MarketDataProvider>, DataError> {
    Ok(match choice {
        ProviderChoice::Yahoo => {
            let breaker = Arc::new(CircuitBreaker::new(config.breaker_cooldown()));
            Box::new(
                YahooProvider::new(breaker, config.timeout())?
                    .with_retries(config.max_retries, config.base_delay()),
            )
        }
        ProviderChoice::Csv(dir) => Box::new(CsvProvider::new(dir.clone())),
        ProviderChoice::Synthetic => Box::new(SyntheticProvider::default()),
    })
}

/// Deterministic random-walk candles.
///
/// The same symbol and timeframe always produce the same series: the RNG is
/// seeded from a BLAKE3 hash of `SYMBOL/timeframe` and the last candle sits
/// at a fixed anchor time.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    anchor: DateTime<Utc>,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            anchor: Utc
                .with_ymd_and_hms(2024, 6, 28, 0, 0, 0)
                .single()
                .unwrap_or_default(),
        }
    }
}

impl SyntheticProvider {
    pub fn with_anchor(anchor: DateTime<Utc>) -> Self {
        Self { anchor }
    }

    fn candle_count(step: Duration, period: AnalysisPeriod) -> usize {
        let days = period.approx_days().unwrap_or(365);
        let count = Duration::days(days).num_seconds() / step.num_seconds().max(1);
        (count.max(1) as usize).min(MAX_SYNTHETIC_CANDLES)
    }

    /// Generate the walk. Unknown timeframes step daily.
    pub fn generate(
        &self,
        symbol: &str,
        timeframe: &Timeframe,
        period: AnalysisPeriod,
    ) -> Result<CandleSeries, DataError> {
        let step = timeframe.duration().unwrap_or_else(|| Duration::days(1));
        let n = Self::candle_count(step, period);

        let seed_key = format!("{}/{}", symbol.to_uppercase(), timeframe.label());
        let mut rng = StdRng::from_seed(*blake3::hash(seed_key.as_bytes()).as_bytes());

        // intraday moves are smaller than daily ones
        let scale = (step.num_seconds() as f64 / 86_400.0).sqrt().clamp(0.05, 1.0);
        let start = self.anchor - step * (n as i32 - 1);
        let mut price = 100.0_f64;
        let mut candles = Vec::with_capacity(n);
        for i in 0..n {
            let ret: f64 = rng.gen_range(-0.03..0.03) * scale;
            let open = price;
            let close = price * (1.0 + ret);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01) * scale);
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01) * scale);
            let volume = rng.gen_range(500_000..5_000_000u64) as f64;
            let candle = Candle::new(start + step * i as i32, open, high, low, close, volume)
                .map_err(|e| DataError::Other(format!("synthetic candle: {e}")))?;
            candles.push(candle);
            price = close;
        }
        CandleSeries::new(candles).map_err(|e| DataError::Other(format!("synthetic series: {e}")))
    }
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &Timeframe,
        period: AnalysisPeriod,
    ) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe: timeframe.clone(),
            series: self.generate(symbol, timeframe, period)?,
            source: DataSource::Synthetic,
        })
    }

    fn fetch_profile(&self, symbol: &str) -> Result<SymbolProfile, DataError> {
        Ok(SymbolProfile {
            company_name: Some(format!("{symbol} (synthetic)")),
            currency: Some("USD".into()),
            ..Default::default()
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn synthetic_data_is_deterministic() {
        let p = SyntheticProvider::default();
        let a = p.generate("SPY", &Timeframe::Daily, AnalysisPeriod::ThreeMonths).unwrap();
        let b = p.generate("SPY", &Timeframe::Daily, AnalysisPeriod::ThreeMonths).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dataset_hash(), b.dataset_hash());
    }

    #[test]
    fn symbol_case_does_not_change_the_walk() {
        let p = SyntheticProvider::default();
        let upper = p.generate("AAPL", &Timeframe::Hourly, AnalysisPeriod::OneMonth).unwrap();
        let lower = p.generate("aapl", &Timeframe::Hourly, AnalysisPeriod::OneMonth).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn different_symbols_and_timeframes_differ() {
        let p = SyntheticProvider::default();
        let spy = p.generate("SPY", &Timeframe::Daily, AnalysisPeriod::OneYear).unwrap();
        let qqq = p.generate("QQQ", &Timeframe::Daily, AnalysisPeriod::OneYear).unwrap();
        let spy_4h = p.generate("SPY", &Timeframe::FourHour, AnalysisPeriod::OneYear).unwrap();
        assert_ne!(spy.dataset_hash(), qqq.dataset_hash());
        assert_ne!(spy.dataset_hash(), spy_4h.dataset_hash());
    }

    #[test]
    fn candle_count_follows_period_and_step() {
        let p = SyntheticProvider::default();
        let daily = p.generate("X", &Timeframe::Daily, AnalysisPeriod::ThreeMonths).unwrap();
        assert_eq!(daily.len(), 91);
        let m15 = p.generate("X", &Timeframe::FifteenMinute, AnalysisPeriod::ThreeMonths).unwrap();
        assert_eq!(m15.len(), MAX_SYNTHETIC_CANDLES);
        let max = p.generate("X", &Timeframe::Daily, AnalysisPeriod::Max).unwrap();
        assert_eq!(max.len(), 365);
    }

    #[test]
    fn series_ends_at_anchor_with_timeframe_spacing() {
        let anchor = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let p = SyntheticProvider::with_anchor(anchor);
        let s = p.generate("X", &Timeframe::FourHour, AnalysisPeriod::FiveDays).unwrap();
        assert_eq!(s.len(), 30);
        assert_eq!(s.last().unwrap().timestamp, anchor);
        let c = s.candles();
        assert_eq!(c[1].timestamp - c[0].timestamp, Duration::hours(4));
    }

    #[test]
    fn fetch_is_tagged_synthetic() {
        let p = SyntheticProvider::default();
        let fetched = p.fetch_candles("BTC-USD", &Timeframe::Daily, AnalysisPeriod::OneMonth).unwrap();
        assert_eq!(fetched.source, DataSource::Synthetic);
        assert_eq!(fetched.series.len(), 30);
        let profile = p.fetch_profile("BTC-USD").unwrap();
        assert_eq!(profile.currency.as_deref(), Some("USD"));
        assert!(p.is_available());
    }

    #[test]
    fn build_provider_selects_by_choice() {
        let cfg = ProviderConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let csv = build_provider(&ProviderChoice::Csv(dir.path().to_path_buf()), &cfg).unwrap();
        assert_eq!(csv.name(), "csv_import");
        assert!(csv.is_available());
        let synthetic = build_provider(&ProviderChoice::Synthetic, &cfg).unwrap();
        assert_eq!(synthetic.name(), "synthetic");
        let yahoo = build_provider(&ProviderChoice::Yahoo, &cfg).unwrap();
        assert_eq!(yahoo.name(), "yahoo_finance");
    }

    proptest! {
        #[test]
        fn synthetic_walk_is_ordered_for_any_symbol(
            symbol in "[A-Z]{1,5}(-USD)?",
            tf in prop::sample::select(Timeframe::STANDARD.to_vec()),
        ) {
            let s = SyntheticProvider::default()
                .generate(&symbol, &tf, AnalysisPeriod::OneMonth)
                .unwrap();
            prop_assert!(!s.is_empty());
            for pair in s.candles().windows(2) {
                prop_assert!(pair[0].timestamp < pair[1].timestamp);
                prop_assert!(pair[1].low > 0.0);
            }
        }
    }
}
