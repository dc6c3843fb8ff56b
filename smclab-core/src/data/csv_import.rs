//! Offline provider backed by a directory of CSV files.
//!
//! Layout: `<root>/<SYMBOL>/<timeframe>.csv` with the header
//! `timestamp,open,high,low,close,volume` (timestamps in unix seconds).
//! An optional `<root>/<SYMBOL>/profile.json` holds a `SymbolProfile`.

use super::canonicalize::{canonicalize, RawCandle};
use super::provider::{
    AnalysisPeriod, DataError, DataSource, FetchResult, MarketDataProvider, SymbolProfile,
};
use crate::domain::{CandleSeries, Timeframe};
use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub struct CsvProvider {
    root: PathBuf,
}

impl CsvProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn candle_path(&self, symbol: &str, timeframe: &Timeframe) -> PathBuf {
        self.root
            .join(symbol)
            .join(format!("{}.csv", timeframe.label()))
    }

    fn read_rows(path: &Path) -> Result<Vec<RawCandle>, DataError> {
        let csv_err = |e: csv::Error| DataError::Csv {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let mut rows = Vec::new();
        for record in reader.deserialize::<CsvRow>() {
            let row = record.map_err(csv_err)?;
            let timestamp = chrono::DateTime::from_timestamp(row.timestamp, 0).ok_or_else(|| {
                DataError::Csv {
                    path: path.display().to_string(),
                    message: format!("invalid timestamp: {}", row.timestamp),
                }
            })?;
            rows.push(RawCandle {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }
        Ok(rows)
    }
}

/// Keep only the candles inside `period`, measured back from the last candle.
fn trim_to_period(series: CandleSeries, period: AnalysisPeriod) -> CandleSeries {
    let Some(days) = period.approx_days() else {
        return series;
    };
    // a timestamp near the calendar minimum has no representable cutoff
    let Some(cutoff) = series
        .last()
        .and_then(|c| c.timestamp.checked_sub_signed(Duration::days(days)))
    else {
        return series;
    };
    let kept = series
        .candles()
        .iter()
        .filter(|c| c.timestamp > cutoff)
        .copied()
        .collect();
    CandleSeries::new(kept).unwrap_or(series)
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &Timeframe,
        period: AnalysisPeriod,
    ) -> Result<FetchResult, DataError> {
        let path = self.candle_path(symbol, timeframe);
        if !path.exists() {
            return Err(DataError::NoLocalData {
                symbol: symbol.to_string(),
                timeframe: timeframe.label().to_string(),
                path: path.display().to_string(),
            });
        }

        let (series, report) = canonicalize(Self::read_rows(&path)?)?;
        let series = trim_to_period(series, period);
        debug!(
            symbol,
            timeframe = %timeframe,
            candles = series.len(),
            dropped_invalid = report.invalid,
            "loaded csv candles"
        );

        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe: timeframe.clone(),
            series,
            source: DataSource::CsvImport,
        })
    }

    fn fetch_profile(&self, symbol: &str) -> Result<SymbolProfile, DataError> {
        let path = self.root.join(symbol).join("profile.json");
        if !path.exists() {
            return Ok(SymbolProfile::default());
        }
        let text = std::fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|e| DataError::Other(format!("{}: {e}", path.display())))
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }
}
