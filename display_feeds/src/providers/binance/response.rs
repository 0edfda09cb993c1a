//! Wire formats of the two Binance endpoints in use, and their conversion to models.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    models::{candle::Candle, ticker::Ticker},
    providers::{ProviderError, lenient},
};

/// Index of the close price inside a kline row.
const KLINE_CLOSE_INDEX: usize = 4;

/// The subset of the 24hr ticker response we read. Binance sends numbers as strings.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TickerResponse {
    #[serde(default)]
    pub last_price: Option<Value>,
    #[serde(default)]
    pub price_change_percent: Option<Value>,
}

impl From<TickerResponse> for Ticker {
    fn from(resp: TickerResponse) -> Self {
        Ticker {
            last_price: lenient::as_f64(resp.last_price.as_ref()),
            price_change_percent: lenient::as_f64(resp.price_change_percent.as_ref()),
        }
    }
}

/// Parses a 24hr ticker body.
pub fn parse_ticker(body: &str) -> Result<Ticker, ProviderError> {
    let resp: TickerResponse = serde_json::from_str(body)?;
    Ok(resp.into())
}

/// Parses a klines body: an array of arrays, `[openTime, open, high, low, close, ...]`.
///
/// A row without a usable close makes the whole series unusable; skipping it
/// would silently shift every later delta.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>, ProviderError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            lenient::as_f64(row.get(KLINE_CLOSE_INDEX))
                .map(Candle::new)
                .ok_or_else(|| ProviderError::Decode(format!("kline row {i} has no numeric close")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_with_string_numbers() {
        let body = r#"{"symbol":"BTCUSDT","lastPrice":"65000.00","priceChangePercent":"-1.200"}"#;
        let ticker = parse_ticker(body).unwrap();
        assert_eq!(ticker.last_price, Some(65000.0));
        assert_eq!(ticker.price_change_percent, Some(-1.2));
    }

    #[test]
    fn ticker_with_missing_or_null_fields() {
        let ticker = parse_ticker(r#"{"symbol":"BTCUSDT","lastPrice":null}"#).unwrap();
        assert_eq!(ticker, Ticker::default());

        let ticker = parse_ticker(r#"{"lastPrice":"n/a","priceChangePercent":"0.5"}"#).unwrap();
        assert_eq!(ticker.last_price, None);
        assert_eq!(ticker.price_change_percent, Some(0.5));
    }

    #[test]
    fn ticker_rejects_non_json() {
        assert!(matches!(
            parse_ticker("<html>502</html>"),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn klines_extract_closes_in_order() {
        let body = r#"[
            [1700000000000,"100.0","101.0","99.0","100.5","12.3",1700003599999,"0",10,"0","0","0"],
            [1700003600000,"100.5","102.0","100.0","101.75","8.1",1700007199999,"0",7,"0","0","0"]
        ]"#;
        let candles = parse_klines(body).unwrap();
        assert_eq!(candles, vec![Candle::new(100.5), Candle::new(101.75)]);
    }

    #[test]
    fn klines_empty_array_is_empty_series() {
        assert!(parse_klines("[]").unwrap().is_empty());
    }

    #[test]
    fn klines_short_row_is_decode_error() {
        let err = parse_klines(r#"[[1700000000000,"1","2"]]"#).unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }
}
