//! Order blocks: the last opposite candle before a decisive move.
//!
//! Bullish: bearish candle `i`, bullish candle `i + 1` closing above `high[i]`.
//! Bearish: bullish candle `i`, bearish candle `i + 1` closing below `low[i]`.
//! The block spans candle `i`'s high/low. Scanning starts at `window`;
//! only the most recent `capacity` matches are kept.

use super::buffer::RecentBuffer;
use crate::domain::CandleSeries;
use crate::format::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBlockKind {
    #[serde(rename = "bullish_ob")]
    Bullish,
    #[serde(rename = "bearish_ob")]
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBlock {
    #[serde(rename = "type")]
    pub kind: OrderBlockKind,
    pub high: f64,
    pub low: f64,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub index: usize,
}

pub fn detect_order_blocks(
    series: &CandleSeries,
    window: usize,
    capacity: usize,
) -> Vec<OrderBlock> {
    let candles = series.candles();
    let mut found = RecentBuffer::new(capacity);

    for i in window..candles.len().saturating_sub(1) {
        let current = &candles[i];
        let next = &candles[i + 1];

        let kind = if current.is_bearish() && next.is_bullish() && next.close > current.high {
            OrderBlockKind::Bullish
        } else if current.is_bullish() && next.is_bearish() && next.close < current.low {
            OrderBlockKind::Bearish
        } else {
            continue;
        };

        found.push(OrderBlock {
            kind,
            high: current.high,
            low: current.low,
            timestamp: current.timestamp,
            index: i,
        });
    }

    found.into_vec()
}
