//! Tunable parameters of the per-timeframe pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameter values that would make a component meaningless.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisConfigError {
    #[error("{field} must be >= 1")]
    Zero { field: &'static str },

    #[error("{field} must be {bound}, got {value}")]
    OutOfRange {
        field: &'static str,
        bound: &'static str,
        value: f64,
    },
}

/// Parameters for one analysis call. Every field has a default, so a partial
/// TOML `[analysis]` table is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// EMA period for the trend estimate.
    pub ema_period: usize,
    /// Half-width of the swing neighbourhood.
    pub swing_window: usize,
    /// First candle index scanned for order blocks.
    pub order_block_window: usize,
    pub max_order_blocks: usize,
    pub max_fair_value_gaps: usize,
    /// Relative price distance for equal highs/lows.
    pub liquidity_tolerance: f64,
    /// Trailing candles for premium/discount zoning.
    pub premium_discount_window: usize,
    pub volume_profile_levels: usize,
    /// Candles echoed into `chart_data`.
    pub chart_candles: usize,
    /// Order blocks at or after this series index count as recent.
    pub order_block_recency_index: usize,
    /// How many of the latest gaps / liquidity zones the signals look at.
    pub recent_signal_count: usize,
    /// Relative distance from price that makes a liquidity zone "near".
    pub liquidity_proximity: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ema_period: 20,
            swing_window: 5,
            order_block_window: 20,
            max_order_blocks: 10,
            max_fair_value_gaps: 20,
            liquidity_tolerance: 0.005,
            premium_discount_window: 50,
            volume_profile_levels: 20,
            chart_candles: 100,
            order_block_recency_index: 80,
            recent_signal_count: 3,
            liquidity_proximity: 0.02,
        }
    }
}

impl AnalysisConfig {
    /// Reject values that would make a component meaningless.
    pub fn validate(&self) -> Result<(), AnalysisConfigError> {
        for (field, value) in [
            ("ema_period", self.ema_period),
            ("premium_discount_window", self.premium_discount_window),
            ("volume_profile_levels", self.volume_profile_levels),
        ] {
            if value == 0 {
                return Err(AnalysisConfigError::Zero { field });
            }
        }
        // negated comparisons also reject NaN
        if !(self.liquidity_tolerance >= 0.0) {
            return Err(AnalysisConfigError::OutOfRange {
                field: "liquidity_tolerance",
                bound: ">= 0",
                value: self.liquidity_tolerance,
            });
        }
        if !(self.liquidity_proximity > 0.0) {
            return Err(AnalysisConfigError::OutOfRange {
                field: "liquidity_proximity",
                bound: "> 0",
                value: self.liquidity_proximity,
            });
        }
        Ok(())
    }
}
