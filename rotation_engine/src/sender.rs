//! Pushes rendered payloads to the Dot device's text endpoint.

use std::time::Duration;

use async_trait::async_trait;
use display_feeds::providers::http::{USER_AGENT, join_url};
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

use crate::content::DisplayPayload;

pub const DEFAULT_BASE_URL: &str = "https://dot.mindreset.tech";

#[derive(Debug, Error)]
pub enum SendError {
    /// Network failure or timeout.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("device API rejected payload (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

impl SendError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

#[async_trait]
pub trait DisplaySender: Send + Sync {
    async fn push(&self, payload: &DisplayPayload) -> Result<(), SendError>;
}

#[async_trait]
impl<T: DisplaySender + ?Sized> DisplaySender for std::sync::Arc<T> {
    async fn push(&self, payload: &DisplayPayload) -> Result<(), SendError> {
        (**self).push(payload).await
    }
}

/// Request body for the text API. The payload body travels as `message`.
#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    title: &'a str,
    message: &'a str,
    signature: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
}

impl<'a> From<&'a DisplayPayload> for TextRequest<'a> {
    fn from(p: &'a DisplayPayload) -> Self {
        Self {
            title: &p.title,
            message: &p.body,
            signature: &p.signature,
            icon: p.icon.as_deref(),
        }
    }
}

/// Client for `POST {base}/api/authV2/open/device/{device_id}/text`.
pub struct DotTextSender {
    client: Client,
    endpoint: String,
    api_key: SecretString,
}

impl DotTextSender {
    pub fn new(
        base_url: &str,
        device_id: &str,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        // Device responses must arrive uncompressed.
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT_ENCODING, header::HeaderValue::from_static("identity"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: text_endpoint(base_url, device_id),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn text_endpoint(base_url: &str, device_id: &str) -> String {
    join_url(base_url, &format!("api/authV2/open/device/{device_id}/text"))
}

#[async_trait]
impl DisplaySender for DotTextSender {
    async fn push(&self, payload: &DisplayPayload) -> Result<(), SendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&TextRequest::from(payload))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(title = %payload.title, status = status.as_u16(), "payload accepted");
        Ok(())
    }
}
