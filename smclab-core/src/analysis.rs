//! Per-timeframe orchestration: one candle series in, one analysis out.
//!
//! Every call builds fresh detector state. Components read the series
//! independently; only the structure and liquidity detectors share the swing
//! scan. Failures stay scoped to the timeframe as an error marker.

use crate::config::AnalysisConfig;
use crate::domain::{Candle, CandleSeries, Timeframe};
use crate::format::{serialize_round2, TIMESTAMP_FORMAT};
use crate::indicators::{detect_swings, estimate_trend, TrendEstimate};
use crate::signals::{synthesize_signals, SignalInputs, TradingSignalSet};
use crate::smc::{
    classify_structure, detect_fair_value_gaps, detect_liquidity_zones, detect_order_blocks,
    premium_discount_zone, FairValueGap, LiquidityZones, OrderBlock, PremiumDiscountZone,
    StructureLevels,
};
use crate::volume_profile::{build_volume_profile, VolumeProfileLevel};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("series has no candles")]
    EmptySeries,

    #[error("{what} is not a finite number")]
    NonFinite { what: &'static str },
}

/// Candle echoed for charting, in presentation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartCandle {
    pub date: String,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(serialize_with = "serialize_round2")]
    pub open: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub high: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub low: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub close: f64,
    pub volume: u64,
}

impl From<&Candle> for ChartCandle {
    fn from(c: &Candle) -> Self {
        Self {
            date: c.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            timestamp: c.timestamp.timestamp(),
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartMoneyConcepts {
    pub structure_levels: StructureLevels,
    pub order_blocks: Vec<OrderBlock>,
    pub fair_value_gaps: Vec<FairValueGap>,
    pub liquidity_zones: LiquidityZones,
    /// Only on the higher timeframes, and only with enough candles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_discount: Option<PremiumDiscountZone>,
}

/// Everything computed for one symbol at one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeAnalysis {
    pub timeframe: Timeframe,
    pub data_points: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub current_price: f64,
    /// Last close minus previous close; zero with a single candle.
    #[serde(serialize_with = "serialize_round2")]
    pub price_change_24h: f64,
    pub chart_data: Vec<ChartCandle>,
    #[serde(rename = "ema_20", default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendEstimate>,
    pub volume_profile: Vec<VolumeProfileLevel>,
    pub smart_money_concepts: SmartMoneyConcepts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub trading_signals: TradingSignalSet,
    /// BLAKE3 of the analysed series.
    pub dataset_hash: String,
}

/// A timeframe's slot in the report: an analysis or a scoped error marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeframeEntry {
    Analysis(Box<TimeframeAnalysis>),
    Error { error: String },
}

impl TimeframeEntry {
    pub fn error(message: impl Into<String>) -> Self {
        TimeframeEntry::Error {
            error: message.into(),
        }
    }

    pub fn no_data(timeframe: &Timeframe) -> Self {
        Self::error(format!("No data available for {timeframe} timeframe"))
    }

    pub fn as_analysis(&self) -> Option<&TimeframeAnalysis> {
        match self {
            TimeframeEntry::Analysis(a) => Some(a),
            TimeframeEntry::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            TimeframeEntry::Analysis(_) => None,
            TimeframeEntry::Error { error } => Some(error),
        }
    }
}

fn ensure_finite(value: f64, what: &'static str) -> Result<f64, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::NonFinite { what })
    }
}

/// Run the full pipeline over one series.
pub fn analyze_timeframe(
    series: &CandleSeries,
    timeframe: &Timeframe,
    config: &AnalysisConfig,
) -> Result<TimeframeAnalysis, AnalysisError> {
    let candles = series.candles();
    let last = candles.last().ok_or(AnalysisError::EmptySeries)?;
    let current_price = last.close;
    let price_change_24h = match candles.len().checked_sub(2) {
        Some(prev) => ensure_finite(current_price - candles[prev].close, "price_change_24h")?,
        None => 0.0,
    };
    let (min, max) = series.price_bounds().ok_or(AnalysisError::EmptySeries)?;
    ensure_finite(max - min, "price range")?;

    let trend = estimate_trend(&series.closes(), config.ema_period);
    if let Some(t) = &trend {
        ensure_finite(t.current, "ema")?;
    }

    let swings = detect_swings(series, config.swing_window);
    let structure_levels = classify_structure(&swings);
    let order_blocks =
        detect_order_blocks(series, config.order_block_window, config.max_order_blocks);
    let fair_value_gaps = detect_fair_value_gaps(series, config.max_fair_value_gaps);
    let liquidity_zones = detect_liquidity_zones(&swings, config.liquidity_tolerance);
    let premium_discount = if timeframe.has_premium_discount() {
        premium_discount_zone(series, config.premium_discount_window)
    } else {
        None
    };
    let volume_profile = build_volume_profile(series, config.volume_profile_levels);

    debug!(
        timeframe = %timeframe,
        candles = candles.len(),
        swing_highs = swings.highs.len(),
        swing_lows = swings.lows.len(),
        order_blocks = order_blocks.len(),
        fair_value_gaps = fair_value_gaps.len(),
        equal_highs = liquidity_zones.equal_highs.len(),
        equal_lows = liquidity_zones.equal_lows.len(),
        "timeframe components computed"
    );

    let trading_signals = synthesize_signals(
        &SignalInputs {
            current_price,
            trend: trend.as_ref(),
            premium_discount: premium_discount.as_ref(),
            order_blocks: &order_blocks,
            fair_value_gaps: &fair_value_gaps,
            liquidity: &liquidity_zones,
        },
        config,
    );

    Ok(TimeframeAnalysis {
        timeframe: timeframe.clone(),
        data_points: candles.len(),
        current_price,
        price_change_24h,
        chart_data: series
            .tail(config.chart_candles)
            .iter()
            .map(ChartCandle::from)
            .collect(),
        trend,
        volume_profile,
        smart_money_concepts: SmartMoneyConcepts {
            structure_levels,
            order_blocks,
            fair_value_gaps,
            liquidity_zones,
            premium_discount,
        },
        context: timeframe.context().map(str::to_string),
        purpose: timeframe.purpose().map(str::to_string),
        trading_signals,
        dataset_hash: series.dataset_hash(),
    })
}

/// Run the pipeline and fold any failure into the timeframe's error marker.
pub fn analyze_entry(
    series: &CandleSeries,
    timeframe: &Timeframe,
    config: &AnalysisConfig,
) -> TimeframeEntry {
    match analyze_timeframe(series, timeframe, config) {
        Ok(analysis) => TimeframeEntry::Analysis(Box::new(analysis)),
        Err(AnalysisError::EmptySeries) => TimeframeEntry::no_data(timeframe),
        Err(e) => TimeframeEntry::error(format!("Analysis failed for {timeframe}: {e}")),
    }
}
