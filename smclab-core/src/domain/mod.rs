//! Domain types for SMC Lab

pub mod candle;
pub mod series;
pub mod timeframe;

pub use candle::{Candle, CandleError};
pub use series::{CandleSeries, SeriesError};
pub use timeframe::Timeframe;

use serde::{Deserialize, Serialize};

/// Directional reading shared by the trend estimator and the signal synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketBias {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}
