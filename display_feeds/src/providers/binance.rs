//! Binance spot market data (public endpoints, no credentials).

pub mod params;
pub mod provider;
pub mod response;

pub use provider::BinanceProvider;
