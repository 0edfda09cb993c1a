//! Text rendering for payload titles and bodies.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Placeholder shown when a temperature is unknown.
pub const MISSING_TEMPERATURE: &str = "--℃";

/// Footer timestamp layout.
pub const SIGNATURE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// `99824.333` -> `"99,824.33"`.
pub fn fmt_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if price.is_sign_negative() && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// `Some(1.23)` -> `"+1.2% ↑"`, `Some(-2.0)` -> `"-2.0% ↓"`; empty when absent or NaN.
pub fn fmt_change(change_percent: Option<f64>) -> String {
    match change_percent {
        Some(cp) if !cp.is_nan() => {
            if cp >= 0.0 {
                format!("+{cp:.1}% ↑")
            } else {
                format!("{cp:.1}% ↓")
            }
        }
        _ => String::new(),
    }
}

pub fn fmt_temperature(celsius: Option<f64>) -> String {
    match celsius {
        Some(t) if t.is_finite() => format!("{t:.0}℃"),
        _ => MISSING_TEMPERATURE.to_string(),
    }
}

pub fn fmt_rsi(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "--".to_string(),
    }
}

/// Human text for a WMO weather code as reported by Open-Meteo.
pub fn weather_description(code: Option<i32>) -> String {
    let Some(code) = code else {
        return "Weather".to_string();
    };
    let text = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Rime fog",
        51 => "Light drizzle",
        53 => "Drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Freezing drizzle",
        61 => "Light rain",
        63 => "Rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Freezing rain",
        71 => "Light snow",
        73 => "Snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Light showers",
        81 => "Showers",
        82 => "Violent showers",
        85 => "Light snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        other => return format!("Code {other}"),
    };
    text.to_string()
}

pub fn signature_timestamp(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format(SIGNATURE_FORMAT).to_string()
}

/// Which way the short-interval readings lean, if all of them agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Momentum {
    Oversold,
    Overbought,
}

/// `None` unless every reading is present and beyond the same threshold.
pub fn classify_momentum(
    readings: &[Option<f64>],
    oversold: f64,
    overbought: f64,
) -> Option<Momentum> {
    if readings.is_empty() {
        return None;
    }
    let values: Option<Vec<f64>> = readings.iter().copied().collect();
    let values = values?;

    if values.iter().all(|v| *v < oversold) {
        Some(Momentum::Oversold)
    } else if values.iter().all(|v| *v > overbought) {
        Some(Momentum::Overbought)
    } else {
        None
    }
}

/// `"ETH"` + `"oversold"` -> `"ETH oversold"`.
pub fn title_with_hint(title: &str, hint: Option<&str>) -> String {
    match hint {
        Some(h) if !h.is_empty() => format!("{title} {h}"),
        _ => title.to_string(),
    }
}
