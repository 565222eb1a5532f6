use async_trait::async_trait;
use futures::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, instrument};

use crate::config::FeedConfig;
use crate::errors::{AppError, AppResult};
use crate::marketdata::events::TradingPair;
use crate::marketdata::feeds::{FeedSource, RawMessageStream};

/// Websocket kline feed, one connection per opened pair.
#[derive(Debug, Clone)]
pub struct WsFeedSource {
    base_url: String,
    interval: String,
}

impl WsFeedSource {
    pub fn new(cfg: &FeedConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            interval: cfg.interval.clone(),
        }
    }

    pub fn endpoint(&self, pair: &TradingPair) -> String {
        stream_url(&self.base_url, &pair.kline_stream(&self.interval))
    }
}

pub fn stream_url(base_url: &str, stream: &str) -> String {
    format!("{}/{stream}", base_url.trim_end_matches('/'))
}

#[async_trait]
impl FeedSource for WsFeedSource {
    #[instrument(skip(self, pair), fields(pair = %pair))]
    async fn open(&self, pair: &TradingPair) -> AppResult<RawMessageStream> {
        let url = self.endpoint(pair);
        info!(url = %url, "connecting to kline stream");

        let (ws_stream, _response) =
            connect_async(url.as_str())
                .await
                .map_err(|source| AppError::Connection {
                    pair: pair.to_string(),
                    source,
                })?;
        info!("kline stream connected");

        let pair = pair.to_string();
        let messages = ws_stream
            .take_while(|msg| futures::future::ready(!matches!(msg, Ok(Message::Close(_)))))
            .filter_map(move |msg| {
                let item = match msg {
                    Ok(Message::Text(text)) => Some(Ok(text)),
                    Ok(other) => {
                        debug!(kind = frame_kind(&other), "skipping non-text frame");
                        None
                    }
                    Err(source) => Some(Err(AppError::Connection {
                        pair: pair.clone(),
                        source,
                    })),
                };
                futures::future::ready(item)
            });

        Ok(messages.boxed())
    }
}

fn frame_kind(msg: &Message) -> &'static str {
    match msg {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "frame",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_stream() {
        let source = WsFeedSource::new(&FeedConfig::default());
        assert_eq!(
            source.endpoint(&TradingPair::new("btcusdt")),
            "wss://stream.binance.com:9443/ws/btcusdt@kline_1m"
        );
    }

    #[test]
    fn endpoint_normalises_missing_slash_and_case() {
        let cfg = FeedConfig {
            base_url: "ws://127.0.0.1:9000/ws".into(),
            interval: "5m".into(),
        };
        let source = WsFeedSource::new(&cfg);
        assert_eq!(
            source.endpoint(&TradingPair::new("ETHUSDT")),
            "ws://127.0.0.1:9000/ws/ethusdt@kline_5m"
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_connection_error() {
        let cfg = FeedConfig {
            base_url: "ws://127.0.0.1:1/ws/".into(),
            interval: "1m".into(),
        };
        let source = WsFeedSource::new(&cfg);
        let err = source.open(&TradingPair::new("btcusdt")).await.err().unwrap();
        assert!(matches!(err, AppError::Connection { .. }));
    }
}
