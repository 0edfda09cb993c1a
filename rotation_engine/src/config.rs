//! Process configuration: an optional TOML file, environment overrides, validation.
//!
//! Every key has a built-in default, so running with no file reproduces the
//! stock rotation `btc -> eth -> weather`. Environment variables then
//! override the handful of settings deployments set directly:
//!
//! | Variable           | Effect                                      |
//! |--------------------|---------------------------------------------|
//! | `INTERVAL_SECS`    | `interval_secs`                             |
//! | `WEATHER_CITY`     | `city` of every weather kind                |
//! | `WEATHER_LAT`      | `latitude` of every weather kind            |
//! | `WEATHER_LON`      | `longitude` of every weather kind           |
//! | `WEATHER_TZ`       | `timezone` of every weather kind            |
//! | `WEATHER_DAY_ONLY` | `day_only` of every weather kind (`1/true/yes`) |
//! | `PORT`             | port of `health.bind`                       |
//!
//! Device credentials never live in the file; see [`Credentials::from_env`].

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono_tz::Tz;
use display_feeds::providers::binance::{self, params::MAX_KLINE_LIMIT};
use display_feeds::providers::open_meteo;
use indexmap::IndexMap;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use shared_utils::env::{
    InvalidEnvVarError, MissingEnvVarError, get_env_opt, get_env_parsed, get_env_var, is_truthy,
};
use thiserror::Error;

use crate::content::{ContentKind, ContentSpec, MomentumSettings, PriceContent, WeatherContent};
use crate::sender;

pub const DEFAULT_TIMEZONE: &str = "Asia/Ho_Chi_Minh";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    InvalidEnv(#[from] InvalidEnvVarError),

    #[error(transparent)]
    MissingEnv(#[from] MissingEnvVarError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatorConfig {
    /// Seconds between ticks; values below the scheduler minimum are raised to it.
    pub interval_secs: u64,
    /// Bound on every outbound request.
    pub request_timeout_secs: u64,
    /// Zone for footer timestamps.
    pub timezone: String,
    /// Fixed footer for calendar cards.
    pub calendar_signature: Option<String>,
    /// JSON file of `icon key -> base64 PNG`.
    pub icons_path: Option<PathBuf>,
    /// Kind names in display order.
    pub sequence: Vec<String>,
    pub kinds: IndexMap<String, ContentSpec>,
    pub endpoints: Endpoints,
    pub health: HealthConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub binance: String,
    pub open_meteo: String,
    /// Calendar service base URL. Calendar kinds need it.
    pub calendar: Option<String>,
    pub dot: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            binance: binance::provider::DEFAULT_BASE_URL.to_string(),
            open_meteo: open_meteo::provider::DEFAULT_BASE_URL.to_string(),
            calendar: None,
            dot: sender::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub bind: SocketAddr,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

impl Default for RotatorConfig {
    fn default() -> Self {
        let mut kinds = IndexMap::new();
        kinds.insert(
            "btc".to_string(),
            ContentSpec::Price(PriceContent {
                symbol: "BTCUSDT".into(),
                title: "BTC".into(),
                icon: Some("btc".into()),
                momentum: None,
            }),
        );
        kinds.insert(
            "eth".to_string(),
            ContentSpec::Price(PriceContent {
                symbol: "ETHUSDT".into(),
                title: "ETH".into(),
                icon: Some("eth".into()),
                momentum: Some(MomentumSettings {
                    pair_symbol: Some("BTCUSDT".into()),
                    ..MomentumSettings::default()
                }),
            }),
        );
        kinds.insert(
            "weather".to_string(),
            ContentSpec::Weather(WeatherContent {
                city: "Di Linh".into(),
                latitude: 11.617917,
                longitude: 108.058922,
                timezone: DEFAULT_TIMEZONE.into(),
                day_only: false,
            }),
        );

        Self {
            interval_secs: 60,
            request_timeout_secs: 30,
            timezone: DEFAULT_TIMEZONE.into(),
            calendar_signature: None,
            icons_path: Some(PathBuf::from("weather.json")),
            sequence: vec!["btc".into(), "eth".into(), "weather".into()],
            kinds,
            endpoints: Endpoints::default(),
            health: HealthConfig::default(),
        }
    }
}

impl RotatorConfig {
    /// Reads `path` (or the defaults when `None`), applies environment
    /// overrides, and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML without environment overrides or validation.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(secs) = get_env_parsed::<u64>("INTERVAL_SECS")? {
            self.interval_secs = secs;
        }
        if let Some(port) = get_env_parsed::<u16>("PORT")? {
            self.health.bind.set_port(port);
        }

        let city = get_env_opt("WEATHER_CITY");
        let lat = get_env_parsed::<f64>("WEATHER_LAT")?;
        let lon = get_env_parsed::<f64>("WEATHER_LON")?;
        let tz = get_env_opt("WEATHER_TZ");
        let day_only = get_env_opt("WEATHER_DAY_ONLY").map(|v| is_truthy(&v));

        for spec in self.kinds.values_mut() {
            let ContentSpec::Weather(weather) = spec else {
                continue;
            };
            if let Some(city) = &city {
                weather.city = city.clone();
            }
            if let Some(lat) = lat {
                weather.latitude = lat;
            }
            if let Some(lon) = lon {
                weather.longitude = lon;
            }
            if let Some(tz) = &tz {
                weather.timezone = tz.clone();
            }
            if let Some(day_only) = day_only {
                weather.day_only = day_only;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence.is_empty() {
            return Err(ConfigError::Invalid("sequence is empty".into()));
        }
        if let Some(name) = self.sequence.iter().find(|n| !self.kinds.contains_key(*n)) {
            return Err(ConfigError::Invalid(format!(
                "sequence names unknown kind {name:?}"
            )));
        }
        self.tz()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be > 0".into()));
        }

        for (name, spec) in &self.kinds {
            match spec {
                ContentSpec::Price(price) => {
                    if let Some(momentum) = &price.momentum {
                        validate_momentum(name, momentum)?;
                    }
                }
                ContentSpec::Weather(weather) => {
                    parse_tz(&weather.timezone)?;
                }
                ContentSpec::Calendar(calendar) => {
                    if self.endpoints.calendar.is_none() {
                        return Err(ConfigError::Invalid(format!(
                            "kind {name:?}: calendar kinds need endpoints.calendar"
                        )));
                    }
                    if !(1..=12).contains(&calendar.month) || !(1..=31).contains(&calendar.day) {
                        return Err(ConfigError::Invalid(format!(
                            "kind {name:?}: bad target date {}/{}",
                            calendar.day, calendar.month
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        parse_tz(&self.timezone)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The rotation sequence resolved against `kinds`.
    pub fn sequence_kinds(&self) -> Result<Vec<ContentKind>, ConfigError> {
        self.sequence
            .iter()
            .map(|name| {
                self.kinds
                    .get(name)
                    .map(|spec| ContentKind::new(name.clone(), spec.clone()))
                    .ok_or_else(|| ConfigError::Invalid(format!("unknown kind {name:?}")))
            })
            .collect()
    }

    pub fn kind(&self, name: &str) -> Option<ContentKind> {
        self.kinds
            .get(name)
            .map(|spec| ContentKind::new(name, spec.clone()))
    }
}

fn validate_momentum(name: &str, momentum: &MomentumSettings) -> Result<(), ConfigError> {
    if momentum.period == 0 {
        return Err(ConfigError::Invalid(format!(
            "kind {name:?}: momentum period must be > 0"
        )));
    }
    if !(1..=MAX_KLINE_LIMIT).contains(&momentum.limit) {
        return Err(ConfigError::Invalid(format!(
            "kind {name:?}: momentum limit must be within 1..={MAX_KLINE_LIMIT}, got {}",
            momentum.limit
        )));
    }
    // RSI over `period` needs `period + 1` closes.
    if (momentum.limit as usize) <= momentum.period {
        return Err(ConfigError::Invalid(format!(
            "kind {name:?}: momentum limit {} leaves no room for period {}",
            momentum.limit, momentum.period
        )));
    }
    Ok(())
}

fn parse_tz(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>()
        .map_err(|_| ConfigError::Invalid(format!("unknown timezone {name:?}")))
}

/// Device credentials, read from `DOT_API_KEY` and `DOT_DEVICE_ID`.
pub struct Credentials {
    pub api_key: SecretString,
    pub device_id: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: SecretString::from(get_env_var("DOT_API_KEY")?),
            device_id: get_env_var("DOT_DEVICE_ID")?,
        })
    }
}
