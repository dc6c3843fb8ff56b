//! Confluence signal synthesis.
//!
//! Rules run in a fixed order and only append, so list order is priority
//! order for consumers:
//! 1. EMA trend agreeing with price position sets the overall bias.
//! 2. Premium/discount side adds a confluence note and an entry cue.
//! 3. The latest recent order block adds an entry cue and a stop cue.
//! 4. The latest few fair value gaps each add an entry cue.
//! 5. The latest few equal-high/equal-low zones near price add a cue each.
//!    Proximity is measured from the reported (two-decimal) price.

use crate::config::AnalysisConfig;
use crate::domain::MarketBias;
use crate::format::round2;
use crate::indicators::{PriceVsEma, TrendEstimate};
use crate::smc::{
    FairValueGap, GapKind, LiquidityZone, LiquidityZones, OrderBlock, OrderBlockKind,
    PremiumDiscountZone,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingSignalSet {
    pub overall_bias: MarketBias,
    pub entry_signals: Vec<String>,
    pub risk_levels: Vec<String>,
    pub confluence_factors: Vec<String>,
}

/// Borrowed view of the detector outputs the rules consume.
#[derive(Debug, Clone, Copy)]
pub struct SignalInputs<'a> {
    pub current_price: f64,
    pub trend: Option<&'a TrendEstimate>,
    pub premium_discount: Option<&'a PremiumDiscountZone>,
    pub order_blocks: &'a [OrderBlock],
    pub fair_value_gaps: &'a [FairValueGap],
    pub liquidity: &'a LiquidityZones,
}

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

pub fn synthesize_signals(inputs: &SignalInputs<'_>, config: &AnalysisConfig) -> TradingSignalSet {
    let mut signals = TradingSignalSet::default();

    if let Some(trend) = inputs.trend {
        match (trend.trend, trend.price_vs_ema) {
            (MarketBias::Bullish, PriceVsEma::Above) => {
                signals.confluence_factors.push(format!(
                    "Price above rising {} EMA (bullish)",
                    trend.period
                ));
                signals.overall_bias = MarketBias::Bullish;
            }
            (MarketBias::Bearish, PriceVsEma::Below) => {
                signals.confluence_factors.push(format!(
                    "Price below falling {} EMA (bearish)",
                    trend.period
                ));
                signals.overall_bias = MarketBias::Bearish;
            }
            _ => {}
        }
    }

    if let Some(zone) = inputs.premium_discount {
        if zone.bias.is_discount_side() {
            signals
                .confluence_factors
                .push("Price in discount zone (bullish bias)".into());
            signals
                .entry_signals
                .push("Look for bullish setups in discount zone".into());
        } else if zone.bias.is_premium_side() {
            signals
                .confluence_factors
                .push("Price in premium zone (bearish bias)".into());
            signals
                .entry_signals
                .push("Look for bearish setups in premium zone".into());
        }
    }

    let latest_recent_block = inputs
        .order_blocks
        .iter()
        .filter(|ob| ob.index >= config.order_block_recency_index)
        .last();
    if let Some(ob) = latest_recent_block {
        match ob.kind {
            OrderBlockKind::Bullish => {
                signals
                    .entry_signals
                    .push(format!("Bullish Order Block at {:.2}", ob.low));
                signals.risk_levels.push(format!("Stop below {:.2}", ob.low));
            }
            OrderBlockKind::Bearish => {
                signals
                    .entry_signals
                    .push(format!("Bearish Order Block at {:.2}", ob.high));
                signals.risk_levels.push(format!("Stop above {:.2}", ob.high));
            }
        }
    }

    for gap in last_n(inputs.fair_value_gaps, config.recent_signal_count) {
        let label = match gap.kind {
            GapKind::Bullish => "Bullish",
            GapKind::Bearish => "Bearish",
        };
        signals
            .entry_signals
            .push(format!("{label} FVG: {:.2} - {:.2}", gap.low, gap.high));
    }

    let price = round2(inputs.current_price);
    let near = |zone: &LiquidityZone| {
        price != 0.0 && (price - zone.average_price).abs() / price < config.liquidity_proximity
    };
    for zone in last_n(&inputs.liquidity.equal_highs, config.recent_signal_count) {
        if near(zone) {
            signals.entry_signals.push(format!(
                "Near Equal Highs liquidity at {:.2}",
                zone.average_price
            ));
        }
    }
    for zone in last_n(&inputs.liquidity.equal_lows, config.recent_signal_count) {
        if near(zone) {
            signals.entry_signals.push(format!(
                "Near Equal Lows liquidity at {:.2}",
                zone.average_price
            ));
        }
    }

    signals
}
