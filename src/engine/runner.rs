use futures::Stream;
use tokio_stream::StreamExt;
use tracing::{info, instrument};

use crate::errors::AppResult;
use crate::marketdata::decoder::decode_message;
use crate::marketdata::events::TradingPair;
use crate::marketdata::tracker::AverageTracker;
use crate::reporting::ReportSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSummary {
    pub pair: TradingPair,
    pub messages: u64,
    pub closed_candles: u64,
}

/// Single-consumer loop for one pair: decode, track, report, in arrival order.
pub struct PairRunner<K> {
    pair: TradingPair,
    tracker: AverageTracker,
    sink: K,
}

impl<K: ReportSink> PairRunner<K> {
    pub fn new(pair: TradingPair, window_size: usize, sink: K) -> Self {
        Self {
            pair,
            tracker: AverageTracker::new(window_size),
            sink,
        }
    }

    /// Runs until the feed ends. The first connection or decode error stops
    /// the loop and is returned.
    #[instrument(skip_all, fields(pair = %self.pair))]
    pub async fn run<S>(mut self, mut messages: S) -> AppResult<PairSummary>
    where
        S: Stream<Item = AppResult<String>> + Unpin,
    {
        let mut summary = PairSummary {
            pair: self.pair.clone(),
            messages: 0,
            closed_candles: 0,
        };

        while let Some(raw) = messages.next().await {
            let raw = raw?;
            summary.messages += 1;
            let update = decode_message(&raw)?;
            if let Some(result) = self.tracker.on_update(&update)? {
                summary.closed_candles += 1;
                self.sink.report(&result)?;
            }
        }

        info!(
            messages = summary.messages,
            closed_candles = summary.closed_candles,
            "feed ended"
        );
        Ok(summary)
    }
}
