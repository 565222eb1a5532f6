use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::marketdata::events::TradingPair;
use crate::utils::time::interval_to_millis;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "FeedConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "FeedConfig::default_interval")]
    pub interval: String,
}

impl FeedConfig {
    fn default_base_url() -> String {
        "wss://stream.binance.com:9443/ws/".to_string()
    }

    fn default_interval() -> String {
        "1m".to_string()
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            interval: Self::default_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "TrackerConfig::default_window_size")]
    pub window_size: usize,
}

impl TrackerConfig {
    fn default_window_size() -> usize {
        20
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            window_size: Self::default_window_size(),
        }
    }
}

/// A configured pair: either a bare symbol or a table with its own window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PairEntry {
    Symbol(String),
    Detailed {
        symbol: String,
        #[serde(default)]
        window_size: Option<usize>,
    },
}

impl PairEntry {
    pub fn symbol(&self) -> &str {
        match self {
            PairEntry::Symbol(symbol) => symbol,
            PairEntry::Detailed { symbol, .. } => symbol,
        }
    }

    fn window_override(&self) -> Option<usize> {
        match self {
            PairEntry::Symbol(_) => None,
            PairEntry::Detailed { window_size, .. } => *window_size,
        }
    }
}

fn default_pairs() -> Vec<PairEntry> {
    ["btcusdt", "ethusdt", "bnbbtc"]
        .into_iter()
        .map(|s| PairEntry::Symbol(s.to_string()))
        .collect()
}

/// A pair resolved against the shared tracker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSpec {
    pub pair: TradingPair,
    pub window_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default = "default_pairs")]
    pub pairs: Vec<PairEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            feed: FeedConfig::default(),
            tracker: TrackerConfig::default(),
            pairs: default_pairs(),
        }
    }
}

impl Settings {
    /// Layers an optional TOML file under `KLINEMA__*` environment variables.
    pub fn load_from(path: impl AsRef<Path>) -> AppResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("KLINEMA").separator("__"));
        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.feed.base_url.trim().is_empty() {
            return Err(AppError::Config("feed.base_url must not be empty".into()));
        }
        if interval_to_millis(&self.feed.interval).is_none() {
            return Err(AppError::Config(format!(
                "feed.interval {:?} is not a valid candle interval",
                self.feed.interval
            )));
        }
        if self.tracker.window_size == 0 {
            return Err(AppError::Config("tracker.window_size must be positive".into()));
        }
        if self.pairs.is_empty() {
            return Err(AppError::Config("at least one pair must be configured".into()));
        }
        for entry in &self.pairs {
            if entry.symbol().trim().is_empty() {
                return Err(AppError::Config("pair symbol must not be empty".into()));
            }
            if entry.window_override() == Some(0) {
                return Err(AppError::Config(format!(
                    "window_size for {} must be positive",
                    entry.symbol()
                )));
            }
        }
        Ok(())
    }

    pub fn pair_specs(&self) -> Vec<PairSpec> {
        self.pairs
            .iter()
            .map(|entry| PairSpec {
                pair: TradingPair::new(entry.symbol()),
                window_size: entry.window_override().unwrap_or(self.tracker.window_size),
            })
            .collect()
    }
}
