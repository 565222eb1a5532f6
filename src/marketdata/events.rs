use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Market identifier such as `btcusdt`; one per feed connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair(String);

impl TradingPair {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stream name for the kline channel, e.g. `btcusdt@kline_1m`.
    pub fn kline_stream(&self, interval: &str) -> String {
        format!("{}@kline_{interval}", self.0.to_lowercase())
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleUpdate {
    pub symbol: String,
    pub close_price: f64,
    pub is_closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageResult {
    pub symbol: String,
    pub window_size: usize,
    pub average: f64,
    pub timestamp: DateTime<Utc>,
}
