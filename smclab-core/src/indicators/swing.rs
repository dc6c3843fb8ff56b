//! Swing high/low detection.
//!
//! Index `i` is a swing high when `high[i]` is >= every other high in
//! `[i - window, i + window]`; symmetric for swing lows with `<=`. Ties are
//! allowed, so adjacent equal extremes can all qualify. The first and last
//! `window` candles never produce a swing.

use crate::domain::CandleSeries;
use crate::format::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwingKind {
    #[serde(rename = "swing_high")]
    High,
    #[serde(rename = "swing_low")]
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: SwingKind,
}

/// Swing highs and lows, each in ascending index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Swings {
    pub highs: Vec<SwingPoint>,
    pub lows: Vec<SwingPoint>,
}

impl Swings {
    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }
}

/// Scan the series for swing points. O(n * window).
pub fn detect_swings(series: &CandleSeries, window: usize) -> Swings {
    let candles = series.candles();
    let mut swings = Swings::default();

    // i + window < len  <=>  i < len - window, without underflow
    for i in window..candles.len() {
        if i + window >= candles.len() {
            break;
        }
        let neighbours = (i - window..=i + window).filter(|&j| j != i);

        let high = candles[i].high;
        if neighbours.clone().all(|j| high >= candles[j].high) {
            swings.highs.push(SwingPoint {
                index: i,
                price: high,
                timestamp: candles[i].timestamp,
                kind: SwingKind::High,
            });
        }

        let low = candles[i].low;
        if neighbours.clone().all(|j| low <= candles[j].low) {
            swings.lows.push(SwingPoint {
                index: i,
                price: low,
                timestamp: candles[i].timestamp,
                kind: SwingKind::Low,
            });
        }
    }

    swings
}
