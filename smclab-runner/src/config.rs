//! TOML configuration for a report run.
//!
//! ```toml
//! [analysis]
//! ema_period = 20
//!
//! [provider]
//! timeout_secs = 30
//! max_retries = 3
//!
//! [request]
//! timeframes = ["1d", "4h", "1h", "15m"]
//! period = "3mo"
//!
//! [webhook]
//! timeout_secs = 30
//! ```
//!
//! Every table and field is optional; missing values take the defaults.

use serde::{Deserialize, Serialize};
use smclab_core::data::AnalysisPeriod;
use smclab_core::domain::Timeframe;
use smclab_core::{AnalysisConfig, AnalysisConfigError};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid [analysis] config: {0}")]
    Analysis(#[from] AnalysisConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Data provider tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub breaker_cooldown_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            base_delay_ms: 500,
            breaker_cooldown_secs: 30 * 60,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn breaker_cooldown(&self) -> Duration {
        Duration::from_secs(self.breaker_cooldown_secs)
    }
}

/// What to analyse when the caller does not say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub timeframes: Vec<Timeframe>,
    pub period: AnalysisPeriod,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeframes: Timeframe::STANDARD.to_vec(),
            period: AnalysisPeriod::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmcConfig {
    pub analysis: AnalysisConfig,
    pub provider: ProviderConfig,
    pub request: RequestConfig,
    pub webhook: WebhookConfig,
}

impl SmcConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SmcConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        if self.request.timeframes.is_empty() {
            return Err(ConfigError::Invalid(
                "request.timeframes must name at least one timeframe".into(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider.timeout_secs must be >= 1".into()));
        }
        if self.webhook.timeout_secs == 0 {
            return Err(ConfigError::Invalid("webhook.timeout_secs must be >= 1".into()));
        }
        Ok(())
    }
}
