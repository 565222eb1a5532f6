pub mod ws_client;

pub use ws_client::{WsFeedSource, stream_url};
