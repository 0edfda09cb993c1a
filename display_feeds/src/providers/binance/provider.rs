use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    models::{
        candle::{Candle, CandleRequest},
        ticker::Ticker,
    },
    providers::{
        PriceProvider, ProviderError, ProviderInitError,
        binance::{
            params::{construct_kline_params, ticker_params},
            response::{parse_klines, parse_ticker},
        },
        http::{build_client, get_text, join_url},
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

pub struct BinanceProvider {
    client: Client,
    base_url: String,
}

impl BinanceProvider {
    /// Creates a new Binance provider against `base_url` (see [`DEFAULT_BASE_URL`]).
    ///
    /// Only public market data endpoints are used, so no keys are needed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderInitError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PriceProvider for BinanceProvider {
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, ProviderError> {
        let url = join_url(&self.base_url, "/api/v3/ticker/24hr");
        let body = get_text(&self.client, &url, &ticker_params(symbol)).await?;
        let ticker = parse_ticker(&body)?;

        tracing::debug!(symbol, price = ?ticker.last_price, "fetched ticker");
        Ok(ticker)
    }

    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, ProviderError> {
        let query = construct_kline_params(request)?;
        let url = join_url(&self.base_url, "/api/v3/klines");
        let body = get_text(&self.client, &url, &query).await?;
        let candles = parse_klines(&body)?;

        tracing::debug!(
            symbol = %request.symbol,
            interval = %request.interval,
            count = candles.len(),
            "fetched candles"
        );
        Ok(candles)
    }
}
