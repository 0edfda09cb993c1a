use serde::Deserialize;
use serde_json::Value;

use crate::{
    models::weather::WeatherReport,
    providers::{ProviderError, lenient},
};

#[derive(Deserialize, Debug, Default)]
pub struct CurrentWeather {
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub weathercode: Option<Value>,
}

/// Daily arrays; index 0 is today in the requested time zone.
#[derive(Deserialize, Debug, Default)]
pub struct Daily {
    #[serde(default)]
    pub temperature_2m_max: Option<Vec<Value>>,
    #[serde(default)]
    pub temperature_2m_min: Option<Vec<Value>>,
    #[serde(default)]
    pub weathercode: Option<Vec<Value>>,
}

#[derive(Deserialize, Debug)]
pub struct ForecastResponse {
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
    #[serde(default)]
    pub daily: Option<Daily>,
}

fn first(values: &Option<Vec<Value>>) -> Option<&Value> {
    values.as_ref().and_then(|v| v.first())
}

impl From<ForecastResponse> for WeatherReport {
    fn from(resp: ForecastResponse) -> Self {
        let current = resp.current_weather.unwrap_or_default();
        let daily = resp.daily.unwrap_or_default();

        WeatherReport {
            current_temperature: lenient::as_f64(current.temperature.as_ref()),
            current_code: lenient::as_i32(current.weathercode.as_ref()),
            daily_max: lenient::as_f64(first(&daily.temperature_2m_max)),
            daily_min: lenient::as_f64(first(&daily.temperature_2m_min)),
            daily_code: lenient::as_i32(first(&daily.weathercode)),
        }
    }
}

/// Parses a forecast body. Only a body that is not a JSON object is an error.
pub fn parse_forecast(body: &str) -> Result<WeatherReport, ProviderError> {
    let resp: ForecastResponse = serde_json::from_str(body)?;
    Ok(resp.into())
}
