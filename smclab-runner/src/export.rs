//! Report export: JSON with schema versioning, and a Markdown summary.
//!
//! Persisted JSON carries `schema_version`. Newer versions than this build
//! understands are rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};
use smclab_core::domain::MarketBias;
use smclab_core::smc::PremiumDiscountBias;
use smclab_core::volume_profile::point_of_control;
use smclab_core::TimeframeEntry;

use crate::report::{MultiTimeframeReport, SCHEMA_VERSION};

/// Cues listed per timeframe in the Markdown summary.
const TOP_CUES: usize = 3;

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(report: &MultiTimeframeReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report to JSON")
}

/// Deserialize a report, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<MultiTimeframeReport> {
    let report: MultiTimeframeReport =
        serde_json::from_str(json).context("failed to deserialize report from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

pub fn write_json(report: &MultiTimeframeReport, path: &Path) -> Result<()> {
    let json = export_json(report)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

pub fn read_json(path: &Path) -> Result<MultiTimeframeReport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown ───────────────────────────────────────────────────────

fn bias_label(bias: MarketBias) -> &'static str {
    match bias {
        MarketBias::Bullish => "Bullish",
        MarketBias::Bearish => "Bearish",
        MarketBias::Neutral => "Neutral",
    }
}

fn zone_label(bias: PremiumDiscountBias) -> &'static str {
    match bias {
        PremiumDiscountBias::Premium => "Premium",
        PremiumDiscountBias::NeutralPremium => "Neutral (premium side)",
        PremiumDiscountBias::NeutralDiscount => "Neutral (discount side)",
        PremiumDiscountBias::Discount => "Discount",
    }
}

fn opt_price(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}"))
}

fn push_list(md: &mut String, title: &str, items: &[String], limit: usize) {
    if items.is_empty() {
        return;
    }
    md.push_str(&format!("**{title}**\n\n"));
    for item in items.iter().take(limit) {
        md.push_str(&format!("- {item}\n"));
    }
    md.push('\n');
}

/// Markdown summary: an overview table, then one section per timeframe in
/// request order.
pub fn generate_markdown(report: &MultiTimeframeReport) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str(&format!("# SMC Report: {}\n\n", report.symbol));

    md.push_str("## Overview\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Symbol | {} |\n", report.symbol));
    md.push_str(&format!("| Name | {} |\n", report.company_name));
    md.push_str(&format!("| Currency | {} |\n", report.currency));
    md.push_str(&format!("| Period | {} |\n", report.analysis_period));
    let labels: Vec<&str> = report.timeframes_analyzed.iter().map(|t| t.label()).collect();
    md.push_str(&format!("| Timeframes | {} |\n", labels.join(", ")));
    md.push_str(&format!(
        "| Current Price | {} |\n",
        opt_price(report.metadata.current_price)
    ));
    md.push_str(&format!(
        "| 52-Week Range | {} to {} |\n",
        opt_price(report.metadata.fifty_two_week_low),
        opt_price(report.metadata.fifty_two_week_high)
    ));
    md.push_str(&format!("| Data Source | {} |\n", report.data_source));
    if report.data_source == "synthetic" {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push_str(&format!(
        "| Fetched | {} |\n",
        report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push('\n');

    for tf in &report.timeframes_analyzed {
        md.push_str(&format!("## {tf}\n\n"));
        let Some(entry) = report.entry(tf) else {
            md.push_str("> not analysed\n\n");
            continue;
        };
        let a = match entry {
            TimeframeEntry::Analysis(a) => a,
            TimeframeEntry::Error { error } => {
                md.push_str(&format!("> {error}\n\n"));
                continue;
            }
        };

        if let Some(context) = &a.context {
            md.push_str(&format!("_{context}_\n\n"));
        }

        md.push_str("| Metric | Value |\n");
        md.push_str("| --- | --- |\n");
        md.push_str(&format!("| Price | {:.2} |\n", a.current_price));
        md.push_str(&format!("| Change | {:+.2} |\n", a.price_change_24h));
        md.push_str(&format!(
            "| Bias | {} |\n",
            bias_label(a.trading_signals.overall_bias)
        ));
        if let Some(trend) = &a.trend {
            md.push_str(&format!(
                "| EMA {} | {:.2} ({}) |\n",
                trend.period,
                trend.current,
                bias_label(trend.trend)
            ));
        }
        if let Some(pd) = &a.smart_money_concepts.premium_discount {
            md.push_str(&format!("| Zone | {} |\n", zone_label(pd.bias)));
        }
        if let Some(poc) = point_of_control(&a.volume_profile) {
            md.push_str(&format!("| Point of Control | {:.2} |\n", poc.price_mid));
        }
        md.push_str(&format!(
            "| Order Blocks / FVGs | {} / {} |\n",
            a.smart_money_concepts.order_blocks.len(),
            a.smart_money_concepts.fair_value_gaps.len()
        ));
        md.push_str(&format!("| Candles | {} |\n", a.data_points));
        md.push('\n');

        let signals = &a.trading_signals;
        push_list(&mut md, "Entry cues", &signals.entry_signals, TOP_CUES);
        push_list(&mut md, "Risk levels", &signals.risk_levels, TOP_CUES);
        push_list(&mut md, "Confluence", &signals.confluence_factors, usize::MAX);
    }

    md
}

pub fn write_markdown(report: &MultiTimeframeReport, path: &Path) -> Result<()> {
    std::fs::write(path, generate_markdown(report))
        .with_context(|| format!("failed to write {}", path.display()))
}
