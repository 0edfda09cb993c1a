//! The one request shape every provider here uses: GET with a query, expect 2xx, read the body.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::providers::{ProviderError, ProviderInitError};

/// User agent sent with every provider request.
pub const USER_AGENT: &str = concat!("dot-rotator/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client for a provider. `timeout` bounds the whole
/// request, connect through body.
pub fn build_client(timeout: Duration) -> Result<Client, ProviderInitError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Sends a GET and returns the body text of a successful response.
pub async fn get_text<Q>(client: &Client, url: &str, query: &Q) -> Result<String, ProviderError>
where
    Q: Serialize + ?Sized,
{
    let response = client.get(url).query(query).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown API error".to_string());
        tracing::debug!(url, status = status.as_u16(), "provider returned error status");
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.text().await?)
}

/// Joins a base URL and a path without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("https://a.b/", "/v1/x"), "https://a.b/v1/x");
        assert_eq!(join_url("https://a.b", "v1/x"), "https://a.b/v1/x");
    }
}
