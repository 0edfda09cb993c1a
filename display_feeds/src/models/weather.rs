//! Weather queries and the typed forecast record.

/// Location for a forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name used by the provider to align the daily arrays.
    pub timezone: String,
}

/// Current conditions plus today's entry of the daily forecast.
///
/// Missing arrays or fields in the provider response come through as `None`;
/// a partially populated forecast is still worth displaying.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeatherReport {
    /// Current temperature in °C.
    pub current_temperature: Option<f64>,
    /// Current WMO weather code.
    pub current_code: Option<i32>,
    /// Today's maximum temperature in °C.
    pub daily_max: Option<f64>,
    /// Today's minimum temperature in °C.
    pub daily_min: Option<f64>,
    /// Today's dominant WMO weather code.
    pub daily_code: Option<i32>,
}

impl WeatherReport {
    /// The code to describe conditions with: current first, then today's.
    pub fn effective_code(&self) -> Option<i32> {
        self.current_code.or(self.daily_code)
    }
}
