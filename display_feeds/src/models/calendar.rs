//! Calendar records: countdown to a yearly date and lunar date conversion.

use chrono::NaiveDate;

/// A recurring yearly target date (e.g. the 1st of the lunar new year as
/// published by the calendar service).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTarget {
    pub month: u32,
    pub day: u32,
}

/// Remaining whole days until the next occurrence of a [`CountdownTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
}

/// A solar date converted to the lunisolar calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LunarDate {
    pub day: u32,
    pub month: u32,
    /// Sexagenary cycle label of the lunar year (e.g. "Bính Ngọ").
    pub cycle: String,
}

/// The solar date being converted, kept alongside the request for logging.
pub type SolarDate = NaiveDate;
