//! CandleSeries: the immutable, timestamp-ordered input to every detector.

use super::candle::{Candle, CandleError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("candle {index} is invalid: {source}")]
    InvalidCandle {
        index: usize,
        #[source]
        source: CandleError,
    },

    #[error("timestamp at index {index} does not increase strictly")]
    NotIncreasing { index: usize },
}

/// Ordered OHLCV samples for one symbol/timeframe.
///
/// Timestamps increase strictly and every candle satisfies its invariants.
/// There is no mutating API: detectors borrow the series read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesError> {
        for (index, candle) in candles.iter().enumerate() {
            candle
                .validate()
                .map_err(|source| SeriesError::InvalidCandle { index, source })?;
            if index > 0 && candle.timestamp <= candles[index - 1].timestamp {
                return Err(SeriesError::NotIncreasing { index });
            }
        }
        Ok(Self { candles })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// The last `n` candles (all of them if the series is shorter).
    pub fn tail(&self, n: usize) -> &[Candle] {
        &self.candles[self.candles.len().saturating_sub(n)..]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// `(min low, max high)` over the whole series.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let first = self.candles.first()?;
        Some(self.candles.iter().fold((first.low, first.high), |(lo, hi), c| {
            (lo.min(c.low), hi.max(c.high))
        }))
    }

    /// Deterministic BLAKE3 hash over timestamps and OHLCV values.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for c in &self.candles {
            hasher.update(&c.timestamp.timestamp().to_le_bytes());
            hasher.update(&c.open.to_le_bytes());
            hasher.update(&c.high.to_le_bytes());
            hasher.update(&c.low.to_le_bytes());
            hasher.update(&c.close.to_le_bytes());
            hasher.update(&c.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}
