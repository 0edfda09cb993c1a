#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use display_feeds::models::calendar::{Countdown, CountdownTarget, LunarDate, SolarDate};
use display_feeds::models::candle::{Candle, CandleRequest};
use display_feeds::models::ticker::Ticker;
use display_feeds::models::weather::{WeatherQuery, WeatherReport};
use display_feeds::providers::{CalendarProvider, PriceProvider, ProviderError, WeatherProvider};
use rotation_engine::clock::FixedClock;
use rotation_engine::content::{BuilderSettings, ContentBuilder, DisplayPayload};
use rotation_engine::icons::IconTable;
use rotation_engine::sender::{DisplaySender, SendError};

/// 10:00 in Ho Chi Minh City.
pub fn daytime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 28, 3, 0, 0).unwrap()
}

/// 20:00 in Ho Chi Minh City.
pub fn nighttime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 28, 13, 0, 0).unwrap()
}

pub fn icon_table() -> IconTable {
    IconTable::new(HashMap::from([
        ("day-rain".to_string(), "ICON_DAY_RAIN".to_string()),
        ("night-alt-rain".to_string(), "ICON_NIGHT_RAIN".to_string()),
        ("na".to_string(), "ICON_NA".to_string()),
        ("btc".to_string(), "ICON_BTC".to_string()),
    ]))
}

pub fn rising(len: usize) -> Vec<Candle> {
    (0..len).map(|i| Candle::new(100.0 + i as f64)).collect()
}

pub fn falling(len: usize) -> Vec<Candle> {
    (0..len).map(|i| Candle::new(100.0 - i as f64)).collect()
}

#[derive(Default)]
pub struct FakePrices {
    pub tickers: HashMap<String, Ticker>,
    /// Keyed by `(symbol, interval)`, e.g. `("ETHUSDT", "1h")`.
    pub candles: HashMap<(String, String), Vec<Candle>>,
    /// Symbols whose candle requests fail.
    pub broken_candles: HashSet<String>,
    pub candle_calls: AtomicUsize,
}

impl FakePrices {
    pub fn with_ticker(
        mut self,
        symbol: &str,
        last_price: Option<f64>,
        change: Option<f64>,
    ) -> Self {
        self.tickers.insert(
            symbol.to_string(),
            Ticker {
                last_price,
                price_change_percent: change,
            },
        );
        self
    }

    pub fn with_candles(mut self, symbol: &str, interval: &str, candles: Vec<Candle>) -> Self {
        self.candles
            .insert((symbol.to_string(), interval.to_string()), candles);
        self
    }
}

#[async_trait]
impl PriceProvider for FakePrices {
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, ProviderError> {
        self.tickers.get(symbol).copied().ok_or(ProviderError::Api {
            status: 400,
            body: format!("unknown symbol {symbol}"),
        })
    }

    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, ProviderError> {
        self.candle_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken_candles.contains(&request.symbol) {
            return Err(ProviderError::Api {
                status: 500,
                body: "klines unavailable".into(),
            });
        }
        Ok(self
            .candles
            .get(&(request.symbol.clone(), request.interval.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeWeather {
    pub report: WeatherReport,
    pub queries: Mutex<Vec<WeatherQuery>>,
}

impl FakeWeather {
    pub fn new(report: WeatherReport) -> Self {
        Self {
            report,
            queries: Mutex::default(),
        }
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn fetch_weather(&self, query: &WeatherQuery) -> Result<WeatherReport, ProviderError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.report)
    }
}

pub struct FakeCalendar {
    pub days: i64,
    pub lunar: LunarDate,
    pub fail_lunar: bool,
    pub asked_dates: Mutex<Vec<SolarDate>>,
}

impl FakeCalendar {
    pub fn new(days: i64, lunar: LunarDate) -> Self {
        Self {
            days,
            lunar,
            fail_lunar: false,
            asked_dates: Mutex::default(),
        }
    }
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn fetch_countdown(&self, _target: CountdownTarget) -> Result<Countdown, ProviderError> {
        Ok(Countdown { days: self.days })
    }

    async fn fetch_lunar_date(&self, date: SolarDate) -> Result<LunarDate, ProviderError> {
        self.asked_dates.lock().unwrap().push(date);
        if self.fail_lunar {
            return Err(ProviderError::Decode("lunar month out of range".into()));
        }
        Ok(self.lunar.clone())
    }
}

/// Records pushed payloads; fails on the listed 1-based push attempts.
#[derive(Default)]
pub struct RecordingSender {
    pub fail_on: Vec<usize>,
    attempts: AtomicUsize,
    pushed: Mutex<Vec<DisplayPayload>>,
}

impl RecordingSender {
    pub fn failing_on(fail_on: Vec<usize>) -> Self {
        Self {
            fail_on,
            ..Self::default()
        }
    }

    pub fn pushed(&self) -> Vec<DisplayPayload> {
        self.pushed.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DisplaySender for RecordingSender {
    async fn push(&self, payload: &DisplayPayload) -> Result<(), SendError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&attempt) {
            return Err(SendError::Rejected {
                status: 502,
                body: "device offline".into(),
            });
        }
        self.pushed.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

pub fn builder(prices: FakePrices, weather: FakeWeather, now: DateTime<Utc>) -> ContentBuilder {
    ContentBuilder::new(
        Arc::new(prices),
        Arc::new(weather),
        icon_table(),
        BuilderSettings::default(),
    )
    .with_clock(Arc::new(FixedClock(now)))
}
