//! SMC Lab Core: candle domain types, smart-money detectors, volume profile,
//! signal synthesis, and market data providers.
//!
//! The analysis side is pure and synchronous:
//! - Domain types (candles, series, timeframes)
//! - Indicators (EMA trend, swing points)
//! - Smart-money detectors (structure, order blocks, fair value gaps,
//!   liquidity zones, premium/discount)
//! - Volume profile and confluence signal synthesis
//! - Per-timeframe orchestration into a serializable analysis
//!
//! The `data` module is the only I/O: providers that turn a symbol and a
//! timeframe into a canonical candle series.

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod format;
pub mod indicators;
pub mod signals;
pub mod smc;
pub mod volume_profile;

pub use analysis::{analyze_entry, analyze_timeframe, AnalysisError, TimeframeAnalysis, TimeframeEntry};
pub use config::{AnalysisConfig, AnalysisConfigError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: analysis inputs and outputs are Send + Sync, so
    /// timeframes can be analysed on worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::CandleSeries>();
        require_sync::<domain::CandleSeries>();
        require_send::<domain::Timeframe>();
        require_sync::<domain::Timeframe>();

        // Detector outputs
        require_send::<indicators::TrendEstimate>();
        require_sync::<indicators::TrendEstimate>();
        require_send::<indicators::Swings>();
        require_sync::<indicators::Swings>();
        require_send::<smc::OrderBlock>();
        require_sync::<smc::OrderBlock>();
        require_send::<smc::FairValueGap>();
        require_sync::<smc::FairValueGap>();
        require_send::<smc::LiquidityZones>();
        require_sync::<smc::LiquidityZones>();
        require_send::<smc::PremiumDiscountZone>();
        require_sync::<smc::PremiumDiscountZone>();
        require_send::<volume_profile::VolumeProfileLevel>();
        require_sync::<volume_profile::VolumeProfileLevel>();
        require_send::<signals::TradingSignalSet>();
        require_sync::<signals::TradingSignalSet>();

        // Orchestration
        require_send::<AnalysisConfig>();
        require_sync::<AnalysisConfig>();
        require_send::<TimeframeAnalysis>();
        require_sync::<TimeframeAnalysis>();
        require_send::<TimeframeEntry>();
        require_sync::<TimeframeEntry>();

        // Providers are shared across the report's fetch loop
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::CsvProvider>();
        require_sync::<data::CsvProvider>();
        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
    }

    /// Architecture contract: detectors take the series by shared reference
    /// and return owned values, so no detector can mutate its input.
    #[test]
    fn detectors_borrow_series_read_only() {
        fn _check_signatures(series: &domain::CandleSeries, cfg: &AnalysisConfig) {
            let swings: indicators::Swings = indicators::detect_swings(series, cfg.swing_window);
            let _: Vec<smc::OrderBlock> =
                smc::detect_order_blocks(series, cfg.order_block_window, cfg.max_order_blocks);
            let _: Vec<smc::FairValueGap> =
                smc::detect_fair_value_gaps(series, cfg.max_fair_value_gaps);
            let _: smc::LiquidityZones =
                smc::detect_liquidity_zones(&swings, cfg.liquidity_tolerance);
            let _: Vec<volume_profile::VolumeProfileLevel> =
                volume_profile::build_volume_profile(series, cfg.volume_profile_levels);
        }
    }
}
