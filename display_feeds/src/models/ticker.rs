//! Rolling 24h ticker snapshot for a single symbol.

/// Last traded price and 24h change for a symbol.
///
/// Both fields are optional: exchanges occasionally return `null` or a
/// non-numeric string for a freshly listed or halted symbol, and deciding
/// whether that is fatal is the consumer's call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ticker {
    /// Last traded price in the quote currency.
    pub last_price: Option<f64>,
    /// Price change over the last 24 hours, in percent.
    pub price_change_percent: Option<f64>,
}
