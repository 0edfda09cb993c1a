//! Provider abstraction for the data sources behind each display card.
//!
//! Three traits split the sources by what they return: [`PriceProvider`] for
//! tickers and candle series, [`WeatherProvider`] for forecasts and
//! [`CalendarProvider`] for countdowns and lunar dates. Each concrete client
//! (Binance, Open-Meteo, the calendar service) implements one of them and
//! turns the vendor's wire format into the typed records in
//! [`crate::models`].
//!
//! The traits are object safe so callers can hold `Arc<dyn PriceProvider>`
//! and swap in fakes under test.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use display_feeds::models::{candle::{Candle, CandleRequest}, ticker::Ticker};
//! use display_feeds::providers::{PriceProvider, ProviderError};
//!
//! struct FixedPrice;
//!
//! #[async_trait]
//! impl PriceProvider for FixedPrice {
//!     async fn fetch_ticker(&self, _symbol: &str) -> Result<Ticker, ProviderError> {
//!         Ok(Ticker { last_price: Some(1.0), price_change_percent: None })
//!     }
//!
//!     async fn fetch_candles(&self, _request: &CandleRequest) -> Result<Vec<Candle>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod binance;
pub mod calendar_api;
pub mod errors;
pub mod http;
mod lenient;
pub mod open_meteo;

use async_trait::async_trait;

pub use errors::{ProviderError, ProviderInitError};

use crate::models::{
    calendar::{Countdown, CountdownTarget, LunarDate, SolarDate},
    candle::{Candle, CandleRequest},
    ticker::Ticker,
    weather::{WeatherQuery, WeatherReport},
};

/// Market data: 24h ticker and historical candles.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the rolling 24h ticker for `symbol`.
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, ProviderError>;

    /// Fetches a candle series, oldest first.
    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, ProviderError>;
}

/// Current conditions and today's forecast for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_weather(&self, query: &WeatherQuery) -> Result<WeatherReport, ProviderError>;
}

/// Countdown and lunar calendar lookups.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Days remaining until the next occurrence of `target`.
    async fn fetch_countdown(&self, target: CountdownTarget) -> Result<Countdown, ProviderError>;

    /// Converts a solar date to the lunar calendar.
    async fn fetch_lunar_date(&self, date: SolarDate) -> Result<LunarDate, ProviderError>;
}
