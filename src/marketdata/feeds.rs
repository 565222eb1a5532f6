use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::AppResult;
use crate::marketdata::events::TradingPair;

/// Raw text payloads of one pair's feed, in arrival order.
pub type RawMessageStream = BoxStream<'static, AppResult<String>>;

/// Opens the raw message stream for a pair. The stream owns its connection
/// and releases it when dropped.
#[async_trait]
pub trait FeedSource: Send + Sync + 'static {
    async fn open(&self, pair: &TradingPair) -> AppResult<RawMessageStream>;
}
