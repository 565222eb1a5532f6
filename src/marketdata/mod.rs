pub mod decoder;
pub mod events;
pub mod feeds;
pub mod tracker;

pub use decoder::decode_message;
pub use events::{CandleUpdate, MovingAverageResult, TradingPair};
pub use feeds::{FeedSource, RawMessageStream};
pub use tracker::{AverageTracker, PriceHistory, TrackerState};
