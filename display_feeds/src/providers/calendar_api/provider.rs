use std::time::Duration;

use async_trait::async_trait;
use chrono::Datelike;
use reqwest::Client;

use crate::{
    models::calendar::{Countdown, CountdownTarget, LunarDate, SolarDate},
    providers::{
        CalendarProvider, ProviderError, ProviderInitError,
        calendar_api::response::{parse_countdown, parse_lunar},
        http::{build_client, get_text, join_url},
    },
};

pub struct CalendarApiProvider {
    client: Client,
    base_url: String,
}

impl CalendarApiProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderInitError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl CalendarProvider for CalendarApiProvider {
    async fn fetch_countdown(&self, target: CountdownTarget) -> Result<Countdown, ProviderError> {
        let url = join_url(&self.base_url, "/countdown");
        let query = [("month", target.month), ("day", target.day)];
        let body = get_text(&self.client, &url, &query).await?;
        parse_countdown(&body)
    }

    async fn fetch_lunar_date(&self, date: SolarDate) -> Result<LunarDate, ProviderError> {
        let url = join_url(&self.base_url, "/lunar");
        let query = [
            ("day", date.day() as i32),
            ("month", date.month() as i32),
            ("year", date.year()),
        ];
        let body = get_text(&self.client, &url, &query).await?;
        let lunar = parse_lunar(&body)?;

        tracing::debug!(
            %date,
            lunar_day = lunar.day,
            lunar_month = lunar.month,
            "converted to lunar"
        );
        Ok(lunar)
    }
}
