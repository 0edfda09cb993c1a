//! Content kinds, the payloads they render to, and the builder that renders them.
//!
//! A [`ContentKind`] is one named rotation slot. Its [`ContentSpec`] says
//! which providers to query and how to lay the result out; the scheduler
//! never looks inside it and only hands it to a [`ContentSource`].

pub mod builder;
pub mod format;

use async_trait::async_trait;
use display_feeds::models::timeframe::TimeFrame;
use display_feeds::providers::ProviderError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use builder::{BuilderSettings, ContentBuilder};

/// What the device shows: a title line, a body, an optional icon, and a footer signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPayload {
    pub title: String,
    pub body: String,
    /// Opaque icon reference (base64 PNG) passed through to the device.
    pub icon: Option<String>,
    pub signature: String,
}

/// A named rotation slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentKind {
    pub name: String,
    pub spec: ContentSpec,
}

impl ContentKind {
    pub fn new(name: impl Into<String>, spec: ContentSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }
}

/// How to produce one kind of card. Tagged by `type` in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSpec {
    Price(PriceContent),
    Weather(WeatherContent),
    Calendar(CalendarContent),
}

/// A ticker card, optionally annotated with RSI momentum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceContent {
    /// Exchange symbol, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Card title, e.g. `BTC`.
    pub title: String,
    /// Icon table key for the card, if any.
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub momentum: Option<MomentumSettings>,
}

/// RSI settings for a price card.
///
/// When every short-interval RSI (the card's own symbol and, if set,
/// `pair_symbol`) is below `oversold` the title gets `oversold_hint`; when
/// every one is above `overbought` it gets `overbought_hint`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumSettings {
    pub period: usize,
    pub short_interval: TimeFrame,
    pub long_interval: TimeFrame,
    /// Candles requested per series.
    pub limit: u32,
    pub pair_symbol: Option<String>,
    pub oversold: f64,
    pub overbought: f64,
    pub oversold_hint: String,
    pub overbought_hint: String,
}

impl Default for MomentumSettings {
    fn default() -> Self {
        Self {
            period: crate::indicator::DEFAULT_RSI_PERIOD,
            short_interval: TimeFrame::ONE_HOUR,
            long_interval: TimeFrame::FOUR_HOURS,
            limit: 100,
            pair_symbol: None,
            oversold: 30.0,
            overbought: 70.0,
            oversold_hint: "oversold".into(),
            overbought_hint: "overbought".into(),
        }
    }
}

/// Current conditions and today's range for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherContent {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone of the location; drives the provider's daily arrays and day/night icons.
    #[serde(default = "default_weather_timezone")]
    pub timezone: String,
    /// Always use day icons.
    #[serde(default)]
    pub day_only: bool,
}

pub(crate) fn default_weather_timezone() -> String {
    crate::config::DEFAULT_TIMEZONE.to_string()
}

/// Countdown to a yearly date plus today's lunar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarContent {
    /// What is being counted down to, e.g. `Tet`.
    pub label: String,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Why a card could not be built.
#[derive(Debug, Error)]
pub enum ContentError {
    /// A fetch failed: network, timeout, non-2xx or malformed body.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The data arrived but cannot be shown (missing price, empty series, ...).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Anything that can render a [`ContentKind`] into a payload.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn build(&self, kind: &ContentKind) -> Result<DisplayPayload, ContentError>;
}

#[async_trait]
impl<T: ContentSource + ?Sized> ContentSource for std::sync::Arc<T> {
    async fn build(&self, kind: &ContentKind) -> Result<DisplayPayload, ContentError> {
        (**self).build(kind).await
    }
}
