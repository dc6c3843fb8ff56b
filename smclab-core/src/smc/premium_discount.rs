//! Premium/discount zoning of a trailing swing range.
//!
//! Over the last `window` candles: swing high = max high, swing low = min
//! low. Levels use the 0.382 / 0.5 retracements of the range and the latest
//! close decides the bias.

use crate::domain::CandleSeries;
use serde::{Deserialize, Serialize};

const RETRACEMENT: f64 = 0.382;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumDiscountBias {
    Premium,
    NeutralPremium,
    NeutralDiscount,
    Discount,
}

impl PremiumDiscountBias {
    /// Discount or neutral-discount: price at or below equilibrium.
    pub fn is_discount_side(&self) -> bool {
        matches!(self, Self::Discount | Self::NeutralDiscount)
    }

    /// Premium or neutral-premium: price above equilibrium.
    pub fn is_premium_side(&self) -> bool {
        matches!(self, Self::Premium | Self::NeutralPremium)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneLevels {
    pub swing_high: f64,
    #[serde(rename = "premium_zone")]
    pub premium_level: f64,
    pub equilibrium: f64,
    #[serde(rename = "discount_zone")]
    pub discount_level: f64,
    pub swing_low: f64,
}

impl ZoneLevels {
    pub fn from_range(swing_high: f64, swing_low: f64) -> Self {
        let range = swing_high - swing_low;
        Self {
            swing_high,
            premium_level: swing_high - range * RETRACEMENT,
            equilibrium: swing_low + range * 0.5,
            discount_level: swing_low + range * RETRACEMENT,
            swing_low,
        }
    }

    pub fn classify(&self, price: f64) -> PremiumDiscountBias {
        if price > self.equilibrium {
            if price > self.premium_level {
                PremiumDiscountBias::Premium
            } else {
                PremiumDiscountBias::NeutralPremium
            }
        } else if price < self.discount_level {
            PremiumDiscountBias::Discount
        } else {
            PremiumDiscountBias::NeutralDiscount
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumDiscountZone {
    pub levels: ZoneLevels,
    #[serde(rename = "current_bias")]
    pub bias: PremiumDiscountBias,
    pub current_price: f64,
}

/// `None` when the series is shorter than `window`.
pub fn premium_discount_zone(series: &CandleSeries, window: usize) -> Option<PremiumDiscountZone> {
    if window == 0 || series.len() < window {
        return None;
    }
    let recent = series.tail(window);
    let swing_high = recent.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let swing_low = recent.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let current_price = series.last()?.close;

    let levels = ZoneLevels::from_range(swing_high, swing_low);
    Some(PremiumDiscountZone {
        levels,
        bias: levels.classify(current_price),
        current_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::series_from_ohlcv;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn levels_for_100_to_200() {
        let l = ZoneLevels::from_range(200.0, 100.0);
        assert!(approx(l.premium_level, 161.8));
        assert!(approx(l.equilibrium, 150.0));
        assert!(approx(l.discount_level, 138.2));
    }

    #[test]
    fn bias_classification() {
        let l = ZoneLevels::from_range(200.0, 100.0);
        assert_eq!(l.classify(170.0), PremiumDiscountBias::Premium);
        assert_eq!(l.classify(155.0), PremiumDiscountBias::NeutralPremium);
        assert_eq!(l.classify(150.0), PremiumDiscountBias::NeutralDiscount);
        assert_eq!(l.classify(145.0), PremiumDiscountBias::NeutralDiscount);
        assert_eq!(l.classify(120.0), PremiumDiscountBias::Discount);
        assert!(PremiumDiscountBias::NeutralDiscount.is_discount_side());
        assert!(PremiumDiscountBias::NeutralPremium.is_premium_side());
    }

    #[test]
    fn uses_trailing_window_only() {
        // an early spike to 500 falls outside a 3-candle window
        let series = series_from_ohlcv(&[
            (150.0, 500.0, 140.0, 150.0, 1.0),
            (150.0, 200.0, 140.0, 150.0, 1.0),
            (150.0, 160.0, 100.0, 150.0, 1.0),
            (150.0, 175.0, 140.0, 170.0, 1.0),
        ]);
        let zone = premium_discount_zone(&series, 3).unwrap();
        assert_eq!(zone.levels.swing_high, 200.0);
        assert_eq!(zone.levels.swing_low, 100.0);
        assert_eq!(zone.current_price, 170.0);
        assert_eq!(zone.bias, PremiumDiscountBias::Premium);
    }

    #[test]
    fn short_series_is_unavailable() {
        let series = series_from_ohlcv(&[(1.0, 2.0, 0.5, 1.5, 1.0)]);
        assert!(premium_discount_zone(&series, 50).is_none());
    }

    #[test]
    fn serializes_original_field_names() {
        let l = ZoneLevels::from_range(200.0, 100.0);
        let zone = PremiumDiscountZone {
            levels: l,
            bias: PremiumDiscountBias::NeutralDiscount,
            current_price: 145.0,
        };
        let json = serde_json::to_value(zone).unwrap();
        assert_eq!(json["current_bias"], "neutral_discount");
        assert!(json["levels"]["premium_zone"].is_number());
        assert!(json["levels"]["discount_zone"].is_number());
    }
}
