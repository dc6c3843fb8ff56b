//! End-to-end pipeline tests: hand-built series through `analyze_timeframe`,
//! and the same series loaded back through the CSV provider.

use chrono::{Duration, TimeZone, Utc};
use smclab_core::data::{AnalysisPeriod, CsvProvider, MarketDataProvider};
use smclab_core::domain::{Candle, CandleSeries, MarketBias, Timeframe};
use smclab_core::smc::{OrderBlockKind, PremiumDiscountBias};
use smclab_core::{analyze_entry, analyze_timeframe, AnalysisConfig, TimeframeEntry};

// ── Fixtures ─────────────────────────────────────────────────────────

fn series(rows: &[(f64, f64, f64, f64, f64)]) -> CandleSeries {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c, v))| {
            Candle::new(base + Duration::days(i as i64), o, h, l, c, v).unwrap()
        })
        .collect();
    CandleSeries::new(candles).unwrap()
}

/// 100 identical small bullish candles with a bearish candle at index 90
/// engulfed by a strong bullish close at 91.
fn planted_order_block() -> Vec<(f64, f64, f64, f64, f64)> {
    let mut rows = vec![(100.0, 101.0, 99.0, 100.5, 1000.0); 100];
    rows[90] = (101.0, 101.5, 99.5, 100.0, 1000.0);
    rows[91] = (100.0, 103.0, 99.8, 102.5, 1000.0);
    rows
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn planted_order_block_drives_daily_signals() {
    let s = series(&planted_order_block());
    let a = analyze_timeframe(&s, &Timeframe::Daily, &AnalysisConfig::default()).unwrap();

    let smc = &a.smart_money_concepts;
    assert_eq!(smc.order_blocks.len(), 1);
    assert_eq!(smc.order_blocks[0].kind, OrderBlockKind::Bullish);
    assert_eq!(smc.order_blocks[0].index, 90);
    assert!(smc.fair_value_gaps.is_empty());

    // the spike at 91 is the only swing high above the plateau
    let hh: Vec<usize> = smc.structure_levels.higher_highs.iter().map(|p| p.index).collect();
    assert_eq!(hh, vec![91]);
    assert!(smc.structure_levels.lower_lows.is_empty());

    assert_eq!(smc.liquidity_zones.equal_highs.len(), 1);
    assert_eq!(smc.liquidity_zones.equal_highs[0].average_price, 101.0);
    assert_eq!(smc.liquidity_zones.equal_lows.len(), 1);
    assert_eq!(smc.liquidity_zones.equal_lows[0].average_price, 99.0);

    let pd = smc.premium_discount.as_ref().unwrap();
    assert_eq!(pd.bias, PremiumDiscountBias::Discount);

    let trend = a.trend.as_ref().unwrap();
    assert_eq!(trend.trend, MarketBias::Bearish);

    let signals = &a.trading_signals;
    assert_eq!(signals.overall_bias, MarketBias::Bearish);
    assert_eq!(
        signals.confluence_factors,
        vec![
            "Price below falling 20 EMA (bearish)",
            "Price in discount zone (bullish bias)",
        ]
    );
    assert_eq!(
        signals.entry_signals,
        vec![
            "Look for bullish setups in discount zone",
            "Bullish Order Block at 99.50",
            "Near Equal Highs liquidity at 101.00",
            "Near Equal Lows liquidity at 99.00",
        ]
    );
    assert_eq!(signals.risk_levels, vec!["Stop below 99.50"]);
}

#[test]
fn hourly_view_of_same_series_has_no_zone_cues() {
    let s = series(&planted_order_block());
    let a = analyze_timeframe(&s, &Timeframe::Hourly, &AnalysisConfig::default()).unwrap();
    assert!(a.smart_money_concepts.premium_discount.is_none());
    assert!(!a
        .trading_signals
        .confluence_factors
        .iter()
        .any(|c| c.contains("zone")));
    assert_eq!(a.context.as_deref(), Some("Entry planning and tighter structure"));
}

#[test]
fn order_block_before_recency_index_is_ignored() {
    let mut rows = planted_order_block();
    rows[90] = rows[0];
    rows[91] = rows[0];
    rows[40] = (101.0, 101.5, 99.5, 100.0, 1000.0);
    rows[41] = (100.0, 103.0, 99.8, 102.5, 1000.0);
    let a = analyze_timeframe(&series(&rows), &Timeframe::Daily, &AnalysisConfig::default())
        .unwrap();
    assert_eq!(a.smart_money_concepts.order_blocks.len(), 1);
    assert!(a.trading_signals.risk_levels.is_empty());
}

#[test]
fn three_candle_scenario_with_zero_window() {
    let s = series(&[
        (12.0, 12.5, 9.5, 10.0, 100.0),
        (10.0, 15.0, 9.8, 14.0, 200.0),
        (14.0, 15.0, 13.0, 14.5, 50.0),
    ]);
    let cfg = AnalysisConfig {
        order_block_window: 0,
        ..Default::default()
    };
    let a = analyze_timeframe(&s, &Timeframe::Daily, &cfg).unwrap();
    let obs = &a.smart_money_concepts.order_blocks;
    assert_eq!(obs.len(), 1);
    assert_eq!(obs[0].kind, OrderBlockKind::Bullish);
    assert_eq!(obs[0].index, 0);
    assert_eq!((obs[0].high, obs[0].low), (12.5, 9.5));
    // too short for swings, EMA and premium/discount
    assert!(a.smart_money_concepts.structure_levels.higher_highs.is_empty());
    assert!(a.trend.is_none());
    assert!(a.smart_money_concepts.premium_discount.is_none());
    assert_eq!(a.price_change_24h, 0.5);
}

#[test]
fn csv_round_trip_matches_direct_analysis() {
    let rows = planted_order_block();
    let direct = series(&rows);

    let dir = tempfile::tempdir().unwrap();
    let sym_dir = dir.path().join("TEST");
    std::fs::create_dir_all(&sym_dir).unwrap();
    let mut body = String::from("timestamp,open,high,low,close,volume\n");
    for c in direct.candles() {
        body.push_str(&format!(
            "{},{},{},{},{},{}\n",
            c.timestamp.timestamp(),
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume
        ));
    }
    std::fs::write(sym_dir.join("1d.csv"), body).unwrap();

    let provider = CsvProvider::new(dir.path());
    let fetched = provider
        .fetch_candles("TEST", &Timeframe::Daily, AnalysisPeriod::Max)
        .unwrap();
    assert_eq!(fetched.series, direct);

    let cfg = AnalysisConfig::default();
    let via_csv = analyze_entry(&fetched.series, &Timeframe::Daily, &cfg);
    let expected = analyze_entry(&direct, &Timeframe::Daily, &cfg);
    assert_eq!(via_csv, expected);
    assert!(matches!(via_csv, TimeframeEntry::Analysis(_)));
}

#[test]
fn serialized_analysis_rounds_prices() {
    let mut rows = planted_order_block();
    rows[99] = (100.0, 101.0, 99.0, 100.456, 1234.9);
    let a = analyze_timeframe(&series(&rows), &Timeframe::Daily, &AnalysisConfig::default())
        .unwrap();
    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["current_price"], 100.46);
    let last = &json["chart_data"][99];
    assert_eq!(last["close"], 100.46);
    assert_eq!(last["volume"], 1234);
    assert_eq!(last["date"], "2024-04-09 00:00:00");
}
