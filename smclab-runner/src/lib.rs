//! SMC Lab Runner: report assembly on top of `smclab-core`.
//!
//! This crate provides:
//! - TOML configuration (analysis parameters, provider tuning, request defaults)
//! - Provider selection (Yahoo, CSV directory, synthetic walk)
//! - Multi-timeframe report assembly with per-timeframe error isolation
//! - Webhook delivery of finished reports
//! - JSON and Markdown export
//! - The popular-symbols catalog

pub mod catalog;
pub mod config;
pub mod data_loader;
pub mod delivery;
pub mod export;
pub mod report;

pub use catalog::{SymbolCatalog, POPULAR_SYMBOLS};
pub use config::{ConfigError, SmcConfig};
pub use data_loader::{build_provider, ProviderChoice, SyntheticProvider};
pub use delivery::{deliver, AnalysisSummary, DeliveryError, DeliveryOutcome};
pub use export::{export_json, generate_markdown, import_json};
pub use report::{
    analyze_symbol, AnalysisRequest, MultiTimeframeReport, ReportMetadata, RunError,
    SCHEMA_VERSION,
};
