//! Row canonicalization: raw provider rows to a valid `CandleSeries`.
//!
//! Sort by timestamp, keep the first row of each duplicate timestamp, drop
//! rows that break the candle invariants. Every dropped row is logged.

use super::provider::DataError;
use crate::domain::{Candle, CandleSeries};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Unvalidated OHLCV row as a provider returned it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCandle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Counts of what canonicalization removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalReport {
    pub duplicates: usize,
    pub invalid: usize,
}

pub fn canonicalize(
    mut rows: Vec<RawCandle>,
) -> Result<(CandleSeries, CanonicalReport), DataError> {
    // stable sort keeps provider order within equal timestamps
    rows.sort_by_key(|r| r.timestamp);

    let mut report = CanonicalReport::default();
    let mut candles: Vec<Candle> = Vec::with_capacity(rows.len());
    let mut last_ts: Option<DateTime<Utc>> = None;

    for row in rows {
        if last_ts == Some(row.timestamp) {
            report.duplicates += 1;
            continue;
        }
        last_ts = Some(row.timestamp);

        match Candle::new(row.timestamp, row.open, row.high, row.low, row.close, row.volume) {
            Ok(candle) => candles.push(candle),
            Err(e) => {
                warn!(timestamp = %row.timestamp, error = %e, "dropping invalid candle");
                report.invalid += 1;
            }
        }
    }

    if report.duplicates > 0 {
        warn!(count = report.duplicates, "dropped duplicate timestamps");
    }

    Ok((CandleSeries::new(candles)?, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(secs: i64, open: f64, high: f64, low: f64) -> RawCandle {
        RawCandle {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            open,
            high,
            low,
            close: open,
            volume: 1000.0,
        }
    }

    #[test]
    fn sorts_by_timestamp() {
        let (series, report) = canonicalize(vec![
            row(300, 100.0, 105.0, 99.0),
            row(100, 101.0, 105.0, 99.0),
            row(200, 102.0, 105.0, 99.0),
        ])
        .unwrap();
        let opens: Vec<f64> = series.candles().iter().map(|c| c.open).collect();
        assert_eq!(opens, vec![101.0, 102.0, 100.0]);
        assert_eq!(report, CanonicalReport::default());
    }

    #[test]
    fn first_duplicate_wins() {
        let (series, report) = canonicalize(vec![
            row(100, 100.0, 105.0, 99.0),
            row(100, 101.0, 106.0, 99.0),
            row(200, 102.0, 107.0, 99.0),
        ])
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.candles()[0].open, 100.0);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn drops_inverted_and_nan_rows() {
        let mut nan = row(300, 100.0, 105.0, 99.0);
        nan.close = f64::NAN;
        let (series, report) = canonicalize(vec![
            row(100, 100.0, 95.0, 105.0),
            row(200, 100.0, 105.0, 99.0),
            nan,
        ])
        .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.candles()[0].timestamp.timestamp(), 200);
        assert_eq!(report.invalid, 2);
    }

    #[test]
    fn empty_input_is_empty_series() {
        let (series, report) = canonicalize(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(report, CanonicalReport::default());
    }
}
