//! Candle series requests and their (deliberately thin) results.

use crate::models::timeframe::TimeFrame;

/// One interval's summarized price data.
///
/// Only the close is consumed downstream, so only the close is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Closing price of the interval.
    pub close: f64,
}

impl Candle {
    pub fn new(close: f64) -> Self {
        Self { close }
    }
}

/// Parameters for requesting a candle series, ordered oldest to newest.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleRequest {
    /// Exchange symbol (e.g. `"BTCUSDT"`).
    pub symbol: String,
    /// Bar interval.
    pub interval: TimeFrame,
    /// Maximum number of candles to return (most recent ones).
    pub limit: u32,
}

impl CandleRequest {
    pub fn new(symbol: impl Into<String>, interval: TimeFrame, limit: u32) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            limit,
        }
    }
}

/// Extracts the close prices of a series, preserving order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
