use crate::{models::candle::CandleRequest, providers::ProviderError};

/// Largest `limit` the kline endpoint accepts.
pub const MAX_KLINE_LIMIT: u32 = 1000;

/// Query for `GET /api/v3/ticker/24hr`.
pub fn ticker_params(symbol: &str) -> Vec<(&'static str, String)> {
    vec![("symbol", symbol.to_string())]
}

/// Validates a candle request and builds the query for `GET /api/v3/klines`.
pub fn construct_kline_params(
    request: &CandleRequest,
) -> Result<Vec<(&'static str, String)>, ProviderError> {
    if request.symbol.trim().is_empty() {
        return Err(ProviderError::Validation("symbol must not be empty".into()));
    }
    if request.limit == 0 || request.limit > MAX_KLINE_LIMIT {
        return Err(ProviderError::Validation(format!(
            "kline limit must be within 1..={MAX_KLINE_LIMIT}, got {}",
            request.limit
        )));
    }

    Ok(vec![
        ("symbol", request.symbol.clone()),
        ("interval", request.interval.to_string()),
        ("limit", request.limit.to_string()),
    ])
}
