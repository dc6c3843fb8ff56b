//! Aggregate fine candles into coarser, UTC-aligned buckets.

use super::provider::DataError;
use crate::domain::{Candle, CandleSeries};
use chrono::{DateTime, Duration, Utc};

/// Resample `series` into buckets of `bucket` length.
///
/// Buckets start at UTC multiples of the bucket length. Each output candle
/// takes the first open, max high, min low, last close and summed volume of
/// its bucket and is stamped with the bucket start. Fails when an aggregate
/// breaks the candle invariants (summed volume overflowing, for one).
pub fn resample(series: &CandleSeries, bucket: Duration) -> Result<CandleSeries, DataError> {
    let width = bucket.num_seconds();
    if width <= 0 {
        return Ok(series.clone());
    }

    let mut out: Vec<Candle> = Vec::new();
    for candle in series.candles() {
        let secs = candle.timestamp.timestamp();
        let start_secs = secs - secs.rem_euclid(width);
        let Some(start) = DateTime::<Utc>::from_timestamp(start_secs, 0) else {
            continue;
        };

        match out.last_mut() {
            Some(acc) if acc.timestamp == start => {
                acc.high = acc.high.max(candle.high);
                acc.low = acc.low.min(candle.low);
                acc.close = candle.close;
                acc.volume += candle.volume;
            }
            _ => out.push(Candle {
                timestamp: start,
                ..*candle
            }),
        }
    }

    Ok(CandleSeries::new(out)?)
}
