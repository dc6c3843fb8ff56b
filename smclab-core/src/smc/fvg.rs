//! Fair value gaps: three-candle imbalances where the wicks of the outer
//! candles do not overlap.
//!
//! For middle candle `i` with neighbours `prev = i - 1` and `next = i + 1`:
//! - bullish when `prev.low > next.high`, gap = `[next.high, prev.low]`
//! - bearish when `prev.high < next.low`, gap = `[prev.high, next.low]`

use super::buffer::RecentBuffer;
use crate::domain::CandleSeries;
use crate::format::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapKind {
    #[serde(rename = "bullish_fvg")]
    Bullish,
    #[serde(rename = "bearish_fvg")]
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairValueGap {
    #[serde(rename = "type")]
    pub kind: GapKind,
    pub high: f64,
    pub low: f64,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub index: usize,
}

/// Scan every interior candle; keep the most recent `capacity` gaps.
pub fn detect_fair_value_gaps(series: &CandleSeries, capacity: usize) -> Vec<FairValueGap> {
    let candles = series.candles();
    let mut found = RecentBuffer::new(capacity);

    for i in 1..candles.len().saturating_sub(1) {
        let prev = &candles[i - 1];
        let next = &candles[i + 1];

        let (kind, high, low) = if prev.low > next.high {
            (GapKind::Bullish, prev.low, next.high)
        } else if prev.high < next.low {
            (GapKind::Bearish, next.low, prev.high)
        } else {
            continue;
        };

        found.push(FairValueGap {
            kind,
            high,
            low,
            timestamp: candles[i].timestamp,
            index: i,
        });
    }

    found.into_vec()
}
