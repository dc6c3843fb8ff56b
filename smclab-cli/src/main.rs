//! SMC Lab CLI: multi-timeframe smart-money analysis.
//!
//! Commands:
//! - `analyze`: fetch and analyse a symbol across timeframes, print or
//!   deliver the JSON report
//! - `symbols`: print the popular-symbols catalog as JSON
//! - `default-config`: print the default TOML configuration
//!
//! Logs go to stderr (`RUST_LOG` overrides the `info` default) so stdout
//! carries only JSON or TOML.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use smclab_core::data::AnalysisPeriod;
use smclab_core::domain::Timeframe;
use smclab_runner::export::{export_json, write_json, write_markdown};
use smclab_runner::{
    analyze_symbol, build_provider, deliver, AnalysisRequest, ProviderChoice, SmcConfig,
    POPULAR_SYMBOLS,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "smclab",
    about = "SMC Lab: smart money concepts analysis across timeframes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a symbol on several timeframes.
    Analyze {
        /// Ticker symbol (e.g., AAPL, BTC-USD, ^GSPC).
        symbol: String,

        /// Comma-separated timeframes. Defaults to the config's request timeframes.
        #[arg(long, value_delimiter = ',')]
        timeframes: Option<Vec<String>>,

        /// Lookback period: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max.
        #[arg(long)]
        period: Option<String>,

        /// POST the report to this URL instead of printing it.
        #[arg(long)]
        callback_url: Option<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read candles from `<DIR>/<SYMBOL>/<timeframe>.csv` instead of Yahoo.
        #[arg(long, conflicts_with = "synthetic")]
        csv_dir: Option<PathBuf>,

        /// Use a deterministic synthetic random walk (development only).
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Write the JSON report to this file.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write a Markdown summary to this file.
        #[arg(long)]
        markdown: Option<PathBuf>,
    },
    /// Print the popular-symbols catalog as JSON.
    Symbols,
    /// Print the default configuration as TOML.
    DefaultConfig,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symbol,
            timeframes,
            period,
            callback_url,
            config,
            csv_dir,
            synthetic,
            output,
            markdown,
        } => run_analyze(AnalyzeArgs {
            symbol,
            timeframes,
            period,
            callback_url,
            config,
            csv_dir,
            synthetic,
            output,
            markdown,
        }),
        Commands::Symbols => {
            println!("{}", serde_json::to_string_pretty(&POPULAR_SYMBOLS)?);
            Ok(())
        }
        Commands::DefaultConfig => {
            print!("{}", SmcConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

struct AnalyzeArgs {
    symbol: String,
    timeframes: Option<Vec<String>>,
    period: Option<String>,
    callback_url: Option<String>,
    config: Option<PathBuf>,
    csv_dir: Option<PathBuf>,
    synthetic: bool,
    output: Option<PathBuf>,
    markdown: Option<PathBuf>,
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SmcConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SmcConfig::default(),
    };

    let mut request = AnalysisRequest::from(config.request.clone());
    if let Some(labels) = args.timeframes {
        let timeframes: Vec<Timeframe> = labels
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(Timeframe::from)
            .collect();
        if timeframes.is_empty() {
            bail!("--timeframes must name at least one timeframe");
        }
        request.timeframes = timeframes;
    }
    if let Some(period) = args.period {
        request.period = period.parse::<AnalysisPeriod>()?;
    }

    let choice = match (args.csv_dir, args.synthetic) {
        (Some(dir), _) => ProviderChoice::Csv(dir),
        (None, true) => ProviderChoice::Synthetic,
        (None, false) => ProviderChoice::Yahoo,
    };
    let provider = build_provider(&choice, &config.provider)?;
    if !provider.is_available() {
        bail!("data provider '{}' is not available", provider.name());
    }

    info!(
        symbol = %args.symbol,
        provider = provider.name(),
        period = %request.period,
        timeframes = request.timeframes.len(),
        "starting analysis"
    );
    let report = analyze_symbol(&args.symbol, &request, provider.as_ref(), &config.analysis)?;

    if let Some(path) = &args.output {
        write_json(&report, path)?;
        info!(path = %path.display(), "report written");
    }
    if let Some(path) = &args.markdown {
        write_markdown(&report, path)?;
        info!(path = %path.display(), "markdown summary written");
    }

    match &args.callback_url {
        Some(url) => {
            let outcome = deliver(url, &report, config.webhook.timeout())?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        None if args.output.is_none() => println!("{}", export_json(&report)?),
        None => {}
    }

    Ok(())
}
