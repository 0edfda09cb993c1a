use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use display_feeds::models::calendar::CountdownTarget;
use display_feeds::models::candle::{CandleRequest, closes};
use display_feeds::models::weather::WeatherQuery;
use display_feeds::providers::{CalendarProvider, PriceProvider, WeatherProvider};
use tracing::debug;

use super::format::{
    Momentum, classify_momentum, fmt_change, fmt_price, fmt_rsi, fmt_temperature,
    signature_timestamp, title_with_hint, weather_description,
};
use super::{
    CalendarContent, ContentError, ContentKind, ContentSource, ContentSpec, DisplayPayload,
    MomentumSettings, PriceContent, WeatherContent,
};
use crate::clock::{Clock, SystemClock};
use crate::icons::{IconResolver, IconTable, is_night_in};
use crate::indicator::rsi;

/// Rendering settings shared by every kind.
#[derive(Debug, Clone)]
pub struct BuilderSettings {
    /// Zone used for the footer timestamp and for "today" in calendar cards.
    pub timezone: Tz,
    /// Fixed footer for calendar cards, replacing the timestamp.
    pub calendar_signature: Option<String>,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Ho_Chi_Minh,
            calendar_signature: None,
        }
    }
}

/// Renders content kinds by querying the data providers.
pub struct ContentBuilder {
    prices: Arc<dyn PriceProvider>,
    weather: Arc<dyn WeatherProvider>,
    calendar: Option<Arc<dyn CalendarProvider>>,
    icons: IconTable,
    clock: Arc<dyn Clock>,
    settings: BuilderSettings,
}

impl ContentBuilder {
    pub fn new(
        prices: Arc<dyn PriceProvider>,
        weather: Arc<dyn WeatherProvider>,
        icons: IconTable,
        settings: BuilderSettings,
    ) -> Self {
        Self {
            prices,
            weather,
            calendar: None,
            icons,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    pub fn with_calendar(mut self, calendar: Arc<dyn CalendarProvider>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn signature(&self) -> String {
        signature_timestamp(self.clock.now(), self.settings.timezone)
    }

    async fn build_price(&self, spec: &PriceContent) -> Result<DisplayPayload, ContentError> {
        let (ticker, momentum) = match &spec.momentum {
            Some(settings) => {
                let (ticker, readings) = tokio::try_join!(
                    async {
                        self.prices
                            .fetch_ticker(&spec.symbol)
                            .await
                            .map_err(ContentError::from)
                    },
                    self.momentum_readings(&spec.symbol, settings),
                )?;
                (ticker, Some((settings, readings)))
            }
            None => (self.prices.fetch_ticker(&spec.symbol).await?, None),
        };

        let price = ticker.last_price.ok_or_else(|| {
            ContentError::Validation(format!("{}: last price missing", spec.symbol))
        })?;

        let mut title = spec.title.clone();
        let mut body = format!(
            "Price: {} USD\nChange: {}",
            fmt_price(price),
            fmt_change(ticker.price_change_percent)
        );

        if let Some((settings, readings)) = momentum {
            let zone = classify_momentum(&readings.short, settings.oversold, settings.overbought);
            let hint = match zone {
                Some(Momentum::Oversold) => Some(settings.oversold_hint.as_str()),
                Some(Momentum::Overbought) => Some(settings.overbought_hint.as_str()),
                None => None,
            };
            title = title_with_hint(&spec.title, hint);
            body.push_str(&format!(
                "\nRSI {}: {}  {}: {}",
                settings.short_interval,
                fmt_rsi(readings.short.first().copied().flatten()),
                settings.long_interval,
                fmt_rsi(readings.long),
            ));
        }

        let icon = spec
            .icon
            .as_deref()
            .and_then(|key| self.icons.get(key))
            .map(str::to_string);

        Ok(DisplayPayload {
            title,
            body,
            icon,
            signature: self.signature(),
        })
    }

    /// Fetches every series the momentum line needs in one concurrent round.
    async fn momentum_readings(
        &self,
        symbol: &str,
        settings: &MomentumSettings,
    ) -> Result<MomentumReadings, ContentError> {
        let short_req = CandleRequest::new(symbol, settings.short_interval, settings.limit);
        let long_req = CandleRequest::new(symbol, settings.long_interval, settings.limit);
        let pair_req = settings
            .pair_symbol
            .as_deref()
            .map(|pair| CandleRequest::new(pair, settings.short_interval, settings.limit));

        let (short, long, pair) = tokio::try_join!(
            self.series_rsi(&short_req, settings.period),
            self.series_rsi(&long_req, settings.period),
            async {
                match &pair_req {
                    Some(req) => self.series_rsi(req, settings.period).await.map(Some),
                    None => Ok(None),
                }
            },
        )?;

        let mut short_readings = vec![short];
        if let Some(pair) = pair {
            short_readings.push(pair);
        }
        Ok(MomentumReadings {
            short: short_readings,
            long,
        })
    }

    async fn series_rsi(
        &self,
        request: &CandleRequest,
        period: usize,
    ) -> Result<Option<f64>, ContentError> {
        let candles = self.prices.fetch_candles(request).await?;
        if candles.is_empty() {
            return Err(ContentError::Validation(format!(
                "{} {}: empty candle series",
                request.symbol, request.interval
            )));
        }
        let value = rsi(&closes(&candles), period);
        debug!(
            symbol = %request.symbol,
            interval = %request.interval,
            rsi = ?value,
            "computed rsi"
        );
        Ok(value)
    }

    async fn build_weather(&self, spec: &WeatherContent) -> Result<DisplayPayload, ContentError> {
        let local_tz: Tz = spec
            .timezone
            .parse()
            .map_err(|_| ContentError::Validation(format!("unknown timezone {}", spec.timezone)))?;

        let query = WeatherQuery {
            latitude: spec.latitude,
            longitude: spec.longitude,
            timezone: spec.timezone.clone(),
        };
        let report = self.weather.fetch_weather(&query).await?;

        let code = report.effective_code();
        let body = format!(
            "{}\n{}\nH:{}  L:{}",
            spec.city,
            weather_description(code),
            fmt_temperature(report.daily_max),
            fmt_temperature(report.daily_min),
        );

        let is_night = is_night_in(self.clock.now(), local_tz);
        let key = IconResolver::new(spec.day_only).resolve(code, is_night);
        debug!(city = %spec.city, code = ?code, icon = key, "resolved weather icon");

        Ok(DisplayPayload {
            title: fmt_temperature(report.current_temperature),
            body,
            icon: self.icons.lookup(key).map(str::to_string),
            signature: self.signature(),
        })
    }

    async fn build_calendar(&self, spec: &CalendarContent) -> Result<DisplayPayload, ContentError> {
        let calendar = self.calendar.as_ref().ok_or_else(|| {
            ContentError::Validation(format!("{}: no calendar provider configured", spec.label))
        })?;

        let today = self.clock.now().with_timezone(&self.settings.timezone).date_naive();
        let target = CountdownTarget {
            month: spec.month,
            day: spec.day,
        };

        let (countdown, lunar) = tokio::try_join!(
            calendar.fetch_countdown(target),
            calendar.fetch_lunar_date(today),
        )?;

        let title = match countdown.days {
            0 => format!("{}: today", spec.label),
            n => format!("{}: {n} days", spec.label),
        };

        Ok(DisplayPayload {
            title,
            body: format!("Lunar {}/{}\n{}", lunar.day, lunar.month, lunar.cycle),
            icon: spec
                .icon
                .as_deref()
                .and_then(|key| self.icons.get(key))
                .map(str::to_string),
            signature: self
                .settings
                .calendar_signature
                .clone()
                .unwrap_or_else(|| self.signature()),
        })
    }
}

struct MomentumReadings {
    /// Own symbol first, then the pair when configured.
    short: Vec<Option<f64>>,
    long: Option<f64>,
}

#[async_trait]
impl ContentSource for ContentBuilder {
    async fn build(&self, kind: &ContentKind) -> Result<DisplayPayload, ContentError> {
        match &kind.spec {
            ContentSpec::Price(spec) => self.build_price(spec).await,
            ContentSpec::Weather(spec) => self.build_weather(spec).await,
            ContentSpec::Calendar(spec) => self.build_calendar(spec).await,
        }
    }
}
