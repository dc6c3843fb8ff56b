//! Exponential Moving Average (EMA) and the trend estimate built on it.
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[0] = close[0].
//! Requires at least `period` values; shorter input yields no trend.

use crate::domain::MarketBias;
use crate::format::serialize_round2;
use crate::format::serialize_round2_opt;
use serde::{Deserialize, Serialize};

/// Where the last close sits relative to the current EMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceVsEma {
    Above,
    Below,
}

/// Trend estimate from the EMA of closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEstimate {
    pub period: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub current: f64,
    #[serde(serialize_with = "serialize_round2_opt")]
    pub previous: Option<f64>,
    pub trend: MarketBias,
    pub price_vs_ema: PriceVsEma,
}

/// EMA over `values`, seeded with the first value.
///
/// Returns an empty vector when `values.len() < period` or `period == 0`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    let mut prev = values[0];
    result.push(prev);
    for &v in &values[1..] {
        let ema = alpha * v + (1.0 - alpha) * prev;
        result.push(ema);
        prev = ema;
    }
    result
}

/// Classify the trend from the last two EMA values.
///
/// `None` when fewer than `period` closes are available. With a single EMA
/// value there is no previous reading and the trend is neutral.
pub fn estimate_trend(closes: &[f64], period: usize) -> Option<TrendEstimate> {
    let ema = ema_series(closes, period);
    let current = *ema.last()?;
    let previous = ema.len().checked_sub(2).map(|i| ema[i]);
    let last_close = *closes.last()?;

    let trend = match previous {
        Some(prev) if current > prev => MarketBias::Bullish,
        Some(_) => MarketBias::Bearish,
        None => MarketBias::Neutral,
    };
    let price_vs_ema = if last_close > current {
        PriceVsEma::Above
    } else {
        PriceVsEma::Below
    };

    Some(TrendEstimate {
        period,
        current,
        previous,
        trend,
        price_vs_ema,
    })
}
