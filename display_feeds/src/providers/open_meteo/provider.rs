use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    models::weather::{WeatherQuery, WeatherReport},
    providers::{
        ProviderError, ProviderInitError, WeatherProvider,
        http::{build_client, get_text, join_url},
        open_meteo::response::parse_forecast,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode";

pub struct OpenMeteoProvider {
    client: Client,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderInitError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

fn forecast_params(query: &WeatherQuery) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", query.latitude.to_string()),
        ("longitude", query.longitude.to_string()),
        ("timezone", query.timezone.clone()),
        ("current_weather", "true".to_string()),
        ("daily", DAILY_FIELDS.to_string()),
    ]
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch_weather(&self, query: &WeatherQuery) -> Result<WeatherReport, ProviderError> {
        let url = join_url(&self.base_url, "/v1/forecast");
        let body = get_text(&self.client, &url, &forecast_params(query)).await?;
        let report = parse_forecast(&body)?;

        tracing::debug!(
            latitude = query.latitude,
            longitude = query.longitude,
            code = ?report.effective_code(),
            "fetched forecast"
        );
        Ok(report)
    }
}
