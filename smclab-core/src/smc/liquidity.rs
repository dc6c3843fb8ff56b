//! Liquidity zones: clusters of swing points at near-equal prices.
//!
//! Greedy single pass in index order. Each unclaimed point seeds a group and
//! claims every later unclaimed point within `tolerance` relative distance of
//! the seed price. Claimed points are never reused. Groups of two or more
//! become zones priced at the member mean. Highs and lows cluster separately.

use crate::format::timestamp_vec;
use crate::indicators::{SwingPoint, Swings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityZone {
    #[serde(rename = "price_level")]
    pub average_price: f64,
    #[serde(rename = "count")]
    pub member_count: usize,
    #[serde(with = "timestamp_vec")]
    pub timestamps: Vec<DateTime<Utc>>,
    /// Series indices of the members, ascending.
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiquidityZones {
    pub equal_highs: Vec<LiquidityZone>,
    pub equal_lows: Vec<LiquidityZone>,
}

pub fn detect_liquidity_zones(swings: &Swings, tolerance: f64) -> LiquidityZones {
    LiquidityZones {
        equal_highs: cluster(&swings.highs, tolerance),
        equal_lows: cluster(&swings.lows, tolerance),
    }
}

fn cluster(points: &[SwingPoint], tolerance: f64) -> Vec<LiquidityZone> {
    let mut claimed = vec![false; points.len()];
    let mut zones = Vec::new();

    for (i, seed) in points.iter().enumerate() {
        if claimed[i] {
            continue;
        }
        claimed[i] = true;
        let mut members = vec![seed];

        for (j, other) in points.iter().enumerate().skip(i + 1) {
            if claimed[j] {
                continue;
            }
            if relative_distance(seed.price, other.price) <= tolerance {
                claimed[j] = true;
                members.push(other);
            }
        }

        if members.len() >= 2 {
            let sum: f64 = members.iter().map(|p| p.price).sum();
            zones.push(LiquidityZone {
                average_price: sum / members.len() as f64,
                member_count: members.len(),
                timestamps: members.iter().map(|p| p.timestamp).collect(),
                indices: members.iter().map(|p| p.index).collect(),
            });
        }
    }

    zones
}

fn relative_distance(base: f64, other: f64) -> f64 {
    if base == 0.0 {
        return if other == 0.0 { 0.0 } else { f64::INFINITY };
    }
    (base - other).abs() / base.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::SwingKind;
    use chrono::{Duration, TimeZone};

    fn highs(prices: &[f64]) -> Swings {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Swings {
            highs: prices
                .iter()
                .enumerate()
                .map(|(i, &price)| SwingPoint {
                    index: 10 + i * 7,
                    price,
                    timestamp: base + Duration::days(10 + i as i64 * 7),
                    kind: SwingKind::High,
                })
                .collect(),
            lows: vec![],
        }
    }

    #[test]
    fn clusters_equal_highs() {
        let z = detect_liquidity_zones(&highs(&[100.0, 120.0, 100.3, 99.8]), 0.005);
        assert_eq!(z.equal_highs.len(), 1);
        let zone = &z.equal_highs[0];
        assert_eq!(zone.member_count, 3);
        assert!((zone.average_price - 100.033_333_333).abs() < 1e-6);
        assert_eq!(zone.indices, vec![10, 24, 31]);
        assert_eq!(zone.timestamps.len(), 3);
        assert!(z.equal_lows.is_empty());
    }

    #[test]
    fn singletons_are_not_zones() {
        let z = detect_liquidity_zones(&highs(&[100.0, 110.0, 120.0]), 0.005);
        assert!(z.equal_highs.is_empty());
    }

    #[test]
    fn claimed_points_are_not_reused() {
        // 100 claims 100.3; 100.6 is within 0.5% of 100.3 but 100.3 is taken,
        // and 100.6 is 0.6% from 100 so it stays alone.
        let z = detect_liquidity_zones(&highs(&[100.0, 100.6, 100.3]), 0.005);
        assert_eq!(z.equal_highs.len(), 1);
        assert_eq!(z.equal_highs[0].indices, vec![10, 24]);
    }

    #[test]
    fn distance_is_relative_to_seed() {
        // 0.5% of 200 = 1.0
        let z = detect_liquidity_zones(&highs(&[200.0, 201.0, 201.1]), 0.005);
        assert_eq!(z.equal_highs.len(), 1);
        assert_eq!(z.equal_highs[0].member_count, 2);
    }

    #[test]
    fn clustering_is_repeatable() {
        let swings = highs(&[50.0, 50.1, 70.0, 70.2, 50.05, 90.0]);
        let a = detect_liquidity_zones(&swings, 0.005);
        let b = detect_liquidity_zones(&swings, 0.005);
        assert_eq!(a, b);
        assert_eq!(a.equal_highs.len(), 2);
    }
}
