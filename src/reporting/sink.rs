use std::io::{self, Write};

use tokio::sync::mpsc;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::marketdata::events::MovingAverageResult;
use crate::utils::math::format_average;
use crate::utils::time::format_timestamp;

/// Destination for one pair's moving-average results. Each pair task owns
/// its own sink.
pub trait ReportSink: Send + 'static {
    fn report(&mut self, result: &MovingAverageResult) -> AppResult<()>;
}

pub fn format_report_line(result: &MovingAverageResult, interval: &str) -> String {
    format!(
        "{}: Moving average for last {} {} candles for pair {} is {}",
        format_timestamp(&result.timestamp),
        result.window_size,
        interval,
        result.symbol,
        format_average(result.average)
    )
}

/// Writes one line per result to standard output.
pub struct StdoutSink {
    interval: String,
}

impl StdoutSink {
    pub fn new(interval: impl Into<String>) -> Self {
        Self {
            interval: interval.into(),
        }
    }
}

impl ReportSink for StdoutSink {
    fn report(&mut self, result: &MovingAverageResult) -> AppResult<()> {
        info!(
            symbol = %result.symbol,
            window = result.window_size,
            average = result.average,
            "moving average updated"
        );
        let line = format_report_line(result, &self.interval);
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

/// Forwards results to an in-process consumer.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<MovingAverageResult>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MovingAverageResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ReportSink for ChannelSink {
    fn report(&mut self, result: &MovingAverageResult) -> AppResult<()> {
        self.tx
            .send(result.clone())
            .map_err(|_| AppError::Other(format!("result receiver for {} dropped", result.symbol)))
    }
}
