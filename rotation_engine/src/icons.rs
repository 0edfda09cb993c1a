//! Weather code → icon key mapping and the icon asset table.
//!
//! Keys follow the "weather icons" naming (`day-sunny`, `night-alt-rain`, ...)
//! used by the bundled `weather.json` asset, which maps each key to a base64
//! PNG. Codes are WMO codes as reported by Open-Meteo.

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, Timelike};
use chrono_tz::Tz;

/// Key used when nothing more specific applies.
pub const FALLBACK_ICON_KEY: &str = "na";

const BUILTIN_ICONS: &str = include_str!("../assets/price_icons.json");

/// Maps WMO weather codes to icon keys, honouring a day-only override.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconResolver {
    day_only: bool,
}

impl IconResolver {
    pub fn new(day_only: bool) -> Self {
        Self { day_only }
    }

    /// Resolves `code` to an icon key. In day-only mode `is_night` is ignored.
    pub fn resolve(&self, code: Option<i32>, is_night: bool) -> &'static str {
        resolve_icon_key(code, is_night && !self.day_only)
    }
}

/// The raw table: `(day, night)` variants per code group.
pub fn resolve_icon_key(code: Option<i32>, is_night: bool) -> &'static str {
    let Some(code) = code else {
        return FALLBACK_ICON_KEY;
    };

    let (day, night) = match code {
        0 => ("day-sunny", "night-clear"),
        1 => ("day-sunny-overcast", "night-alt-partly-cloudy"),
        2 => ("day-cloudy", "night-alt-partly-cloudy"),
        3 => ("cloudy", "night-alt-cloudy"),
        45 | 48 => ("day-fog", "night-fog"),
        51 | 53 | 55 => ("day-sprinkle", "night-alt-sprinkle"),
        56 | 57 | 66 | 67 => ("day-sleet", "night-alt-sleet"),
        61 | 63 => ("day-rain", "night-alt-rain"),
        65 => ("day-rain-wind", "night-alt-rain-wind"),
        71 | 73 | 75 | 85 | 86 => ("day-snow", "night-alt-snow"),
        77 => ("snow", "snow"),
        80..=82 => ("day-showers", "night-alt-showers"),
        95 => ("day-thunderstorm", "night-alt-thunderstorm"),
        96 | 99 => ("day-hail", "night-alt-hail"),
        _ => return FALLBACK_ICON_KEY,
    };

    if is_night { night } else { day }
}

/// Night is 18:00 to 06:00 local time.
pub fn is_night_hour(hour: u32) -> bool {
    !(6..18).contains(&hour)
}

/// Whether `now` falls in the night window of `tz`.
pub fn is_night_in<Z: chrono::TimeZone>(now: DateTime<Z>, tz: Tz) -> bool {
    is_night_hour(now.with_timezone(&tz).hour())
}

/// Icon assets keyed by icon key. Values are opaque references (base64 PNGs)
/// handed to the sender untouched.
#[derive(Debug, Clone, Default)]
pub struct IconTable {
    icons: HashMap<String, String>,
}

impl IconTable {
    pub fn new(icons: HashMap<String, String>) -> Self {
        Self { icons }
    }

    /// Loads a JSON object of `key → base64 PNG`.
    ///
    /// Icons are decoration, so a missing or malformed file is logged and
    /// yields an empty table instead of stopping the process.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(table) => {
                tracing::info!(path = %path.display(), icons = table.len(), "loaded icon table");
                table
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "cannot load icon table");
                Self::default()
            }
        }
    }

    /// Icons shipped with the binary (`btc`, `eth`).
    pub fn builtin() -> Self {
        match serde_json::from_str(BUILTIN_ICONS) {
            Ok(icons) => Self::new(icons),
            Err(e) => {
                tracing::error!(error = %e, "bundled icon table is malformed");
                Self::default()
            }
        }
    }

    /// The built-in icons overlaid with `path`, if given. File entries win.
    pub fn load_with_builtin(path: Option<&Path>) -> Self {
        let mut table = Self::builtin();
        if let Some(path) = path {
            table.icons.extend(Self::load(path).icons);
        }
        table
    }

    fn try_load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let icons: HashMap<String, String> = serde_json::from_str(&text)?;
        Ok(Self::new(icons))
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.icons.get(key).map(String::as_str)
    }

    /// Lookup falling back to the `"na"` entry, then to no icon at all.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).or_else(|| self.get(FALLBACK_ICON_KEY))
    }
}
