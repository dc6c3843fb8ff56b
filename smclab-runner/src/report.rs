//! Multi-timeframe report assembly.
//!
//! Fetching is sequential because the upstream provider is rate-limited.
//! Analysis of the fetched series is pure, so the timeframes are analysed in
//! parallel with rayon. A failure on one timeframe becomes that timeframe's
//! error marker and never aborts the report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smclab_core::data::{AnalysisPeriod, DataError, MarketDataProvider, SymbolProfile};
use smclab_core::domain::{CandleSeries, Timeframe};
use smclab_core::format::serialize_round2_opt;
use smclab_core::{analyze_entry, AnalysisConfig, TimeframeEntry};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RequestConfig;

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Symbol is required")]
    EmptySymbol,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Which timeframes and how far back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub timeframes: Vec<Timeframe>,
    pub period: AnalysisPeriod,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        RequestConfig::default().into()
    }
}

impl From<RequestConfig> for AnalysisRequest {
    fn from(cfg: RequestConfig) -> Self {
        Self {
            timeframes: cfg.timeframes,
            period: cfg.period,
        }
    }
}

/// Symbol facts reported alongside the analyses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Last close of the daily analysis, when one succeeded.
    #[serde(serialize_with = "serialize_round2_opt")]
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    #[serde(rename = "52_week_high")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(rename = "52_week_low")]
    pub fifty_two_week_low: Option<f64>,
}

/// The full report for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTimeframeReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub company_name: String,
    pub currency: String,
    pub analysis_period: AnalysisPeriod,
    pub timeframes_analyzed: Vec<Timeframe>,
    /// Keyed by timeframe label.
    pub multi_timeframe_analysis: BTreeMap<String, TimeframeEntry>,
    pub metadata: ReportMetadata,
    pub data_source: String,
    pub fetched_at: DateTime<Utc>,
}

impl MultiTimeframeReport {
    pub fn entry(&self, timeframe: &Timeframe) -> Option<&TimeframeEntry> {
        self.multi_timeframe_analysis.get(timeframe.label())
    }

    /// Candle count summed over the timeframes that produced an analysis.
    pub fn total_data_points(&self) -> usize {
        self.multi_timeframe_analysis
            .values()
            .filter_map(TimeframeEntry::as_analysis)
            .map(|a| a.data_points)
            .sum()
    }

    pub fn failed_timeframes(&self) -> Vec<&str> {
        self.multi_timeframe_analysis
            .iter()
            .filter(|(_, e)| e.error_message().is_some())
            .map(|(label, _)| label.as_str())
            .collect()
    }
}

/// Fetch and analyse every requested timeframe for `symbol`.
pub fn analyze_symbol(
    symbol: &str,
    request: &AnalysisRequest,
    provider: &dyn MarketDataProvider,
    config: &AnalysisConfig,
) -> Result<MultiTimeframeReport, RunError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(RunError::EmptySymbol);
    }
    if request.timeframes.is_empty() {
        return Err(RunError::InvalidRequest(
            "at least one timeframe is required".into(),
        ));
    }

    let mut timeframes: Vec<Timeframe> = Vec::with_capacity(request.timeframes.len());
    for tf in &request.timeframes {
        if !timeframes.contains(tf) {
            timeframes.push(tf.clone());
        }
    }

    let profile = provider.fetch_profile(&symbol).unwrap_or_else(|e| {
        warn!(symbol = %symbol, error = %e, "profile fetch failed, using defaults");
        SymbolProfile::default()
    });

    let fetched: Vec<(Timeframe, Result<CandleSeries, String>)> = timeframes
        .iter()
        .map(|tf| {
            let outcome = provider
                .fetch_candles(&symbol, tf, request.period)
                .map(|f| f.series)
                .map_err(|e| {
                    warn!(symbol = %symbol, timeframe = %tf, error = %e, "fetch failed");
                    e.to_string()
                });
            (tf.clone(), outcome)
        })
        .collect();

    let multi_timeframe_analysis: BTreeMap<String, TimeframeEntry> = fetched
        .par_iter()
        .map(|(tf, outcome)| {
            let entry = match outcome {
                Ok(series) => analyze_entry(series, tf, config),
                Err(cause) => TimeframeEntry::error(format!("Data fetch failed for {tf}: {cause}")),
            };
            match &entry {
                TimeframeEntry::Analysis(a) => info!(
                    symbol = %symbol,
                    timeframe = %tf,
                    candles = a.data_points,
                    bias = ?a.trading_signals.overall_bias,
                    "timeframe analysed"
                ),
                TimeframeEntry::Error { error } => {
                    info!(symbol = %symbol, timeframe = %tf, error = %error, "timeframe skipped")
                }
            }
            (tf.label().to_string(), entry)
        })
        .collect();

    let current_price = multi_timeframe_analysis
        .get(Timeframe::Daily.label())
        .and_then(TimeframeEntry::as_analysis)
        .map(|a| a.current_price);

    Ok(MultiTimeframeReport {
        schema_version: SCHEMA_VERSION,
        company_name: profile.company_name.unwrap_or_else(|| symbol.clone()),
        currency: profile.currency.unwrap_or_else(|| "USD".to_string()),
        symbol,
        analysis_period: request.period,
        timeframes_analyzed: timeframes,
        multi_timeframe_analysis,
        metadata: ReportMetadata {
            current_price,
            market_cap: profile.market_cap,
            pe_ratio: profile.pe_ratio,
            fifty_two_week_high: profile.fifty_two_week_high,
            fifty_two_week_low: profile.fifty_two_week_low,
        },
        data_source: provider.name().to_string(),
        fetched_at: Utc::now(),
    })
}
