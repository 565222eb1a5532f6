pub mod app;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exchange;
pub mod marketdata;
pub mod reporting;
pub mod telemetry;
pub mod utils;

pub use crate::app::App;
pub use crate::config::Settings;
pub use crate::errors::{AppError, AppResult};
