use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    #[error("connection error for {pair}: {source}")]
    Connection {
        pair: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} pair task(s) failed")]
    PairsFailed(usize),

    #[error("other: {0}")]
    Other(String),
}

pub type AppResult<T, E = AppError> = Result<T, E>;
