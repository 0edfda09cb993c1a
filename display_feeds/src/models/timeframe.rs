//! Candle intervals in the compact `"<amount><unit>"` notation (`15m`, `4h`, `1d`, `1M`).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeFrameError {
    #[error("Invalid amount for {:?}: {}", unit, message)]
    InvalidAmount {
        unit: TimeFrameUnit,
        message: String,
    },

    #[error("Invalid input: {}", message)]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeFrameUnit {
    fn suffix(self) -> char {
        match self {
            TimeFrameUnit::Minute => 'm',
            TimeFrameUnit::Hour => 'h',
            TimeFrameUnit::Day => 'd',
            TimeFrameUnit::Week => 'w',
            TimeFrameUnit::Month => 'M',
        }
    }

    /// Amounts the kline endpoints accept for this unit.
    fn allowed_amounts(self) -> &'static [u32] {
        match self {
            TimeFrameUnit::Minute => &[1, 3, 5, 15, 30],
            TimeFrameUnit::Hour => &[1, 2, 4, 6, 8, 12],
            TimeFrameUnit::Day => &[1, 3],
            TimeFrameUnit::Week | TimeFrameUnit::Month => &[1],
        }
    }
}

/// A validated candle interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeFrame {
    amount: u32,
    unit: TimeFrameUnit,
}

impl TimeFrame {
    pub const ONE_HOUR: Self = Self {
        amount: 1,
        unit: TimeFrameUnit::Hour,
    };

    pub const FOUR_HOURS: Self = Self {
        amount: 4,
        unit: TimeFrameUnit::Hour,
    };

    pub fn new(amount: u32, unit: TimeFrameUnit) -> Result<Self, TimeFrameError> {
        if !unit.allowed_amounts().contains(&amount) {
            return Err(TimeFrameError::InvalidAmount {
                unit,
                message: format!(
                    "{amount} is not one of the supported amounts {:?}",
                    unit.allowed_amounts()
                ),
            });
        }
        Ok(Self { amount, unit })
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || TimeFrameError::InvalidInput {
            message: format!("expected <amount><m|h|d|w|M>, got {s:?}"),
        };

        let suffix = s.chars().last().ok_or_else(invalid)?;
        let unit = match suffix {
            'm' => TimeFrameUnit::Minute,
            'h' => TimeFrameUnit::Hour,
            'd' => TimeFrameUnit::Day,
            'w' => TimeFrameUnit::Week,
            'M' => TimeFrameUnit::Month,
            _ => return Err(invalid()),
        };
        let amount = s[..s.len() - suffix.len_utf8()]
            .parse::<u32>()
            .map_err(|_| invalid())?;

        Self::new(amount, unit)
    }
}

impl TryFrom<String> for TimeFrame {
    type Error = TimeFrameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeFrame> for String {
    fn from(value: TimeFrame) -> Self {
        value.to_string()
    }
}
