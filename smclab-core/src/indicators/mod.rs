//! Series indicators consumed by the detectors.
//!
//! - `ema`: exponential moving average and trend classification
//! - `swing`: local extrema scan feeding structure and liquidity detection

pub mod ema;
pub mod swing;

pub use ema::{ema_series, estimate_trend, PriceVsEma, TrendEstimate};
pub use swing::{detect_swings, SwingKind, SwingPoint, Swings};

/// Build a daily series from explicit highs and lows for testing.
///
/// Open and close sit at the midpoint, volume = 1000, one candle per day
/// starting 2024-01-01.
#[cfg(test)]
pub fn series_from_highs_lows(highs: &[f64], lows: &[f64]) -> crate::domain::CandleSeries {
    use crate::domain::{Candle, CandleSeries};
    use chrono::{Duration, TimeZone, Utc};

    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = highs
        .iter()
        .zip(lows)
        .enumerate()
        .map(|(i, (&high, &low))| {
            let mid = (high + low) / 2.0;
            Candle::new(base + Duration::days(i as i64), mid, high, low, mid, 1000.0).unwrap()
        })
        .collect();
    CandleSeries::new(candles).unwrap()
}

/// Build a daily series from `(open, high, low, close, volume)` tuples for testing.
#[cfg(test)]
pub fn series_from_ohlcv(rows: &[(f64, f64, f64, f64, f64)]) -> crate::domain::CandleSeries {
    use crate::domain::{Candle, CandleSeries};
    use chrono::{Duration, TimeZone, Utc};

    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c, v))| {
            Candle::new(base + Duration::days(i as i64), o, h, l, c, v).unwrap()
        })
        .collect();
    CandleSeries::new(candles).unwrap()
}
