//! Timeframe labels and their static analysis context.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timeframe label.
///
/// The four standard labels carry a context/purpose annotation. Any other
/// label is accepted verbatim as `Other` and gets no annotation and no
/// premium/discount zoning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Timeframe {
    Daily,
    FourHour,
    Hourly,
    FifteenMinute,
    Other(String),
}

impl Timeframe {
    /// The standard set, in the default request order.
    pub const STANDARD: [Timeframe; 4] = [
        Timeframe::Daily,
        Timeframe::FourHour,
        Timeframe::Hourly,
        Timeframe::FifteenMinute,
    ];

    pub fn label(&self) -> &str {
        match self {
            Timeframe::Daily => "1d",
            Timeframe::FourHour => "4h",
            Timeframe::Hourly => "1h",
            Timeframe::FifteenMinute => "15m",
            Timeframe::Other(label) => label,
        }
    }

    /// What this timeframe shows about the market.
    pub fn context(&self) -> Option<&'static str> {
        match self {
            Timeframe::Daily => Some("Trend direction and overall market structure"),
            Timeframe::FourHour => Some("Medium-term structure and reaction zones"),
            Timeframe::Hourly => Some("Entry planning and tighter structure"),
            Timeframe::FifteenMinute => Some("Entry timing and confirmation"),
            Timeframe::Other(_) => None,
        }
    }

    /// What a trader uses this timeframe for.
    pub fn purpose(&self) -> Option<&'static str> {
        match self {
            Timeframe::Daily => Some("Identify major support/resistance and overall bias"),
            Timeframe::FourHour => Some("Refine entries based on daily bias"),
            Timeframe::Hourly => Some("Fine-tune entry levels and stop placement"),
            Timeframe::FifteenMinute => Some("Precise entry execution and quick confirmations"),
            Timeframe::Other(_) => None,
        }
    }

    /// Only the higher timeframes get premium/discount zoning.
    pub fn has_premium_discount(&self) -> bool {
        matches!(self, Timeframe::Daily | Timeframe::FourHour)
    }

    /// Nominal candle duration for the standard labels.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Timeframe::Daily => Some(Duration::days(1)),
            Timeframe::FourHour => Some(Duration::hours(4)),
            Timeframe::Hourly => Some(Duration::hours(1)),
            Timeframe::FifteenMinute => Some(Duration::minutes(15)),
            Timeframe::Other(_) => None,
        }
    }
}

impl From<&str> for Timeframe {
    fn from(label: &str) -> Self {
        match label.trim() {
            "1d" => Timeframe::Daily,
            "4h" => Timeframe::FourHour,
            "1h" => Timeframe::Hourly,
            "15m" => Timeframe::FifteenMinute,
            other => Timeframe::Other(other.to_string()),
        }
    }
}

impl From<String> for Timeframe {
    fn from(label: String) -> Self {
        Timeframe::from(label.as_str())
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.label().to_string()
    }
}

impl FromStr for Timeframe {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Timeframe::from(s))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
