use tracing::debug;

use crate::errors::AppResult;
use crate::marketdata::events::{CandleUpdate, MovingAverageResult};
use crate::utils::math::moving_average;
use crate::utils::time::now;

/// Closing prices in arrival order. Only closed candles are ever appended.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    prices: Vec<f64>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, price: f64) {
        self.prices.push(price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Accumulating,
}

#[derive(Debug)]
pub struct AverageTracker {
    window_size: usize,
    history: PriceHistory,
    state: TrackerState,
}

impl AverageTracker {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            history: PriceHistory::new(),
            state: TrackerState::Idle,
        }
    }

    /// Records a closed candle and returns the fresh average; open candles
    /// are ignored.
    pub fn on_update(&mut self, update: &CandleUpdate) -> AppResult<Option<MovingAverageResult>> {
        if !update.is_closed {
            debug!(symbol = %update.symbol, price = update.close_price, "candle still open");
            return Ok(None);
        }

        self.history.push(update.close_price);
        self.state = TrackerState::Accumulating;
        let average = moving_average(self.window_size, self.history.as_slice())?;

        Ok(Some(MovingAverageResult {
            symbol: update.symbol.clone(),
            window_size: self.window_size,
            average,
            timestamp: now(),
        }))
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(price: f64, is_closed: bool) -> CandleUpdate {
        CandleUpdate {
            symbol: "test_pair".into(),
            close_price: price,
            is_closed,
        }
    }

    fn averages(tracker: &mut AverageTracker, updates: &[CandleUpdate]) -> Vec<f64> {
        updates
            .iter()
            .filter_map(|u| tracker.on_update(u).unwrap())
            .map(|r| r.average)
            .collect()
    }

    #[test]
    fn starts_idle() {
        let tracker = AverageTracker::new(2);
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn closed_candles_produce_running_average() {
        let mut tracker = AverageTracker::new(2);
        let updates: Vec<_> = [1.0, 2.0, 3.0, 4.0, 5.0]
            .into_iter()
            .map(|p| candle(p, true))
            .collect();
        assert_eq!(averages(&mut tracker, &updates), vec![1.0, 1.5, 2.5, 3.5, 4.5]);
        assert_eq!(tracker.state(), TrackerState::Accumulating);
        assert_eq!(tracker.history().len(), 5);
    }

    #[test]
    fn open_candles_never_enter_history() {
        let mut tracker = AverageTracker::new(2);
        let updates = [candle(1.0, true), candle(2.0, false), candle(3.0, true)];
        assert_eq!(averages(&mut tracker, &updates), vec![1.0, 2.0]);
        assert_eq!(tracker.history().as_slice(), &[1.0, 3.0]);
    }

    #[test]
    fn open_candle_leaves_idle_tracker_idle() {
        let mut tracker = AverageTracker::new(2);
        assert!(tracker.on_update(&candle(7.0, false)).unwrap().is_none());
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test]
    fn result_carries_symbol_and_window() {
        let mut tracker = AverageTracker::new(20);
        let result = tracker.on_update(&candle(10.0, true)).unwrap().unwrap();
        assert_eq!(result.symbol, "test_pair");
        assert_eq!(result.window_size, 20);
        assert_eq!(result.average, 10.0);
    }
}
