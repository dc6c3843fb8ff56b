//! Volume profile: traded volume distributed over equal-width price bins.
//!
//! `[min low, max high]` is split into `levels` bins. Each candle apportions
//! its volume to every bin its `[low, high]` range overlaps, in proportion to
//! the overlap length over the candle range. Zero-range candles contribute
//! nothing. The bin with the greatest (truncated) volume is the point of
//! control; ties go to the lowest-priced bin.

use crate::domain::CandleSeries;
use crate::format::serialize_round2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfileLevel {
    #[serde(rename = "price_level", serialize_with = "serialize_round2")]
    pub price_mid: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub price_low: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub price_high: f64,
    /// Allocated volume, truncated toward zero.
    pub volume: u64,
    #[serde(rename = "is_poc", default)]
    pub is_point_of_control: bool,
}

/// Bin edges: `levels + 1` evenly spaced values from `min` to `max`.
///
/// The last edge is exactly `max` so the bins tile the range without a gap.
fn bin_edges(min: f64, max: f64, levels: usize) -> Vec<f64> {
    let width = (max - min) / levels as f64;
    (0..=levels)
        .map(|i| if i == levels { max } else { min + width * i as f64 })
        .collect()
}

/// Raw (untruncated) per-bin allocation for the given bin edges.
pub fn allocate_volume(series: &CandleSeries, edges: &[f64]) -> Vec<f64> {
    let mut volumes = vec![0.0; edges.len().saturating_sub(1)];

    for (bin, pair) in edges.windows(2).enumerate() {
        let (bin_low, bin_high) = (pair[0], pair[1]);
        for candle in series.candles() {
            let overlap_low = bin_low.max(candle.low);
            let overlap_high = bin_high.min(candle.high);
            if overlap_high <= overlap_low {
                continue;
            }
            let range = candle.range();
            if range > 0.0 {
                volumes[bin] += candle.volume * (overlap_high - overlap_low) / range;
            }
        }
    }

    volumes
}

/// Build the profile. Empty or flat series (no price range) and `levels == 0`
/// yield an empty profile.
pub fn build_volume_profile(series: &CandleSeries, levels: usize) -> Vec<VolumeProfileLevel> {
    let Some((min, max)) = series.price_bounds() else {
        return Vec::new();
    };
    if levels == 0 || !(max > min) {
        return Vec::new();
    }

    let edges = bin_edges(min, max, levels);
    let volumes = allocate_volume(series, &edges);

    let mut profile: Vec<VolumeProfileLevel> = edges
        .windows(2)
        .zip(&volumes)
        .map(|(pair, &volume)| VolumeProfileLevel {
            price_mid: (pair[0] + pair[1]) / 2.0,
            price_low: pair[0],
            price_high: pair[1],
            volume: volume.max(0.0) as u64,
            is_point_of_control: false,
        })
        .collect();

    // first maximum in ascending price order
    let poc = profile
        .iter()
        .enumerate()
        .fold(None::<(usize, u64)>, |best, (i, level)| match best {
            Some((_, v)) if v >= level.volume => best,
            _ => Some((i, level.volume)),
        });
    if let Some((i, _)) = poc {
        profile[i].is_point_of_control = true;
    }

    profile
}

/// The point-of-control level, if any.
pub fn point_of_control(profile: &[VolumeProfileLevel]) -> Option<&VolumeProfileLevel> {
    profile.iter().find(|l| l.is_point_of_control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::series_from_ohlcv;

    #[test]
    fn splits_candle_volume_by_overlap() {
        // range 0..10 in 10 bins; second candle spans 2..6 -> 4 bins of 250
        let series = series_from_ohlcv(&[
            (5.0, 10.0, 0.0, 5.0, 0.0),
            (3.0, 6.0, 2.0, 5.0, 1000.0),
        ]);
        let profile = build_volume_profile(&series, 10);
        assert_eq!(profile.len(), 10);
        let vols: Vec<u64> = profile.iter().map(|l| l.volume).collect();
        assert_eq!(vols, vec![0, 0, 250, 250, 250, 250, 0, 0, 0, 0]);
        // tie among 2..6 goes to the lowest price
        assert!(profile[2].is_point_of_control);
        assert_eq!(profile.iter().filter(|l| l.is_point_of_control).count(), 1);
    }

    #[test]
    fn bins_are_contiguous_and_ascending() {
        let series = series_from_ohlcv(&[
            (100.0, 103.0, 99.0, 102.0, 500.0),
            (102.0, 107.5, 101.0, 106.0, 800.0),
            (106.0, 106.5, 97.25, 98.0, 300.0),
        ]);
        let profile = build_volume_profile(&series, 20);
        assert_eq!(profile.len(), 20);
        assert_eq!(profile[0].price_low, 97.25);
        assert_eq!(profile[19].price_high, 107.5);
        for w in profile.windows(2) {
            assert_eq!(w[0].price_high, w[1].price_low);
            assert!(w[0].price_low < w[0].price_high);
        }
    }

    #[test]
    fn candle_allocation_sums_to_its_volume() {
        let series = series_from_ohlcv(&[
            (100.0, 110.0, 90.0, 105.0, 0.0),
            (96.0, 103.7, 93.3, 101.0, 777.0),
        ]);
        let (min, max) = series.price_bounds().unwrap();
        let edges = bin_edges(min, max, 13);
        let raw = allocate_volume(&series, &edges);
        let total: f64 = raw.iter().sum();
        assert!((total - 777.0).abs() < 1e-6, "total={total}");
    }

    #[test]
    fn flat_or_empty_series_has_no_profile() {
        assert!(build_volume_profile(&CandleSeries::empty(), 20).is_empty());
        let flat = series_from_ohlcv(&[(5.0, 5.0, 5.0, 5.0, 100.0), (5.0, 5.0, 5.0, 5.0, 100.0)]);
        assert!(build_volume_profile(&flat, 20).is_empty());
        let series = series_from_ohlcv(&[(1.0, 2.0, 0.5, 1.5, 1.0)]);
        assert!(build_volume_profile(&series, 0).is_empty());
    }

    #[test]
    fn zero_volume_still_marks_one_poc() {
        let series = series_from_ohlcv(&[(1.0, 2.0, 0.5, 1.5, 0.0)]);
        let profile = build_volume_profile(&series, 4);
        assert_eq!(point_of_control(&profile).map(|l| l.price_low), Some(0.5));
    }

    #[test]
    fn serializes_rounded_fields() {
        let series = series_from_ohlcv(&[(1.0, 2.0, 0.333, 1.5, 10.0)]);
        let profile = build_volume_profile(&series, 3);
        let json = serde_json::to_value(&profile[0]).unwrap();
        assert_eq!(json["price_low"], 0.33);
        assert!(json["is_poc"].is_boolean());
        assert!(json["volume"].is_u64());
    }
}
