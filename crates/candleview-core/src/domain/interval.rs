use std::str::FromStr;

use serde::Serialize;

use crate::ValidationError;

/// Supported charting granularities, in advertised order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    OneMinute,
    TwoMinutes,
    ThreeMinutes,
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    FourHours,
    OneDay,
    OneWeek,
    OneMonth,
}

impl Interval {
    pub const ALL: [Self; 13] = [
        Self::OneMinute,
        Self::TwoMinutes,
        Self::ThreeMinutes,
        Self::FiveMinutes,
        Self::TenMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::TwoHours,
        Self::FourHours,
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
    ];

    /// Canonical machine code as stored in `candles.interval_type`.
    pub const fn code(self) -> &'static str {
        match self {
            Self::OneMinute => "CANDLE_INTERVAL_1_MIN",
            Self::TwoMinutes => "CANDLE_INTERVAL_2_MIN",
            Self::ThreeMinutes => "CANDLE_INTERVAL_3_MIN",
            Self::FiveMinutes => "CANDLE_INTERVAL_5_MIN",
            Self::TenMinutes => "CANDLE_INTERVAL_10_MIN",
            Self::FifteenMinutes => "CANDLE_INTERVAL_15_MIN",
            Self::ThirtyMinutes => "CANDLE_INTERVAL_30_MIN",
            Self::OneHour => "CANDLE_INTERVAL_HOUR",
            Self::TwoHours => "CANDLE_INTERVAL_2_HOUR",
            Self::FourHours => "CANDLE_INTERVAL_4_HOUR",
            Self::OneDay => "CANDLE_INTERVAL_DAY",
            Self::OneWeek => "CANDLE_INTERVAL_WEEK",
            Self::OneMonth => "CANDLE_INTERVAL_MONTH",
        }
    }

    /// Human-readable label shown in the interval picker.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneMinute => "1 minute",
            Self::TwoMinutes => "2 minutes",
            Self::ThreeMinutes => "3 minutes",
            Self::FiveMinutes => "5 minutes",
            Self::TenMinutes => "10 minutes",
            Self::FifteenMinutes => "15 minutes",
            Self::ThirtyMinutes => "30 minutes",
            Self::OneHour => "1 hour",
            Self::TwoHours => "2 hours",
            Self::FourHours => "4 hours",
            Self::OneDay => "1 day",
            Self::OneWeek => "1 week",
            Self::OneMonth => "1 month",
        }
    }

    /// Exact, case-sensitive lookup of an advertised code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|interval| interval.code() == code)
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    /// Same exact match as [`Interval::from_code`], with a descriptive error.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_code(value).ok_or_else(|| ValidationError::InvalidInterval {
            value: value.to_owned(),
        })
    }
}

/// Interval entry as advertised to clients: `{"value": ..., "label": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// The advertised interval table, fixed at compile time.
pub static SUPPORTED_INTERVALS: [IntervalOption; 13] = build_options();

const fn build_options() -> [IntervalOption; 13] {
    let mut options = [IntervalOption { value: "", label: "" }; 13];
    let mut index = 0;
    while index < Interval::ALL.len() {
        let interval = Interval::ALL[index];
        options[index] = IntervalOption {
            value: interval.code(),
            label: interval.label(),
        };
        index += 1;
    }
    options
}
