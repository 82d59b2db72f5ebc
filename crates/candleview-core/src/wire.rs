//! JSON shapes consumed by the charting client.

use candleview_warehouse::StoreDiagnostics;
use serde::{Serialize, Serializer};

use crate::Candle;

/// Largest integer an f64 represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Write whole prices as JSON integers (`100`) and the rest as floats (`100.5`).
pub fn serialize_price<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let value = *value;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(value as i64)
    } else {
        serializer.serialize_f64(value)
    }
}

/// Candle as sent to the chart: millisecond timestamp plus OHLCV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleRecord {
    pub timestamp: i64,
    #[serde(serialize_with = "serialize_price")]
    pub open: f64,
    #[serde(serialize_with = "serialize_price")]
    pub high: f64,
    #[serde(serialize_with = "serialize_price")]
    pub low: f64,
    #[serde(serialize_with = "serialize_price")]
    pub close: f64,
    pub volume: i64,
}

impl From<&Candle> for CandleRecord {
    fn from(candle: &Candle) -> Self {
        Self {
            timestamp: candle.ts.unix_millis(),
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
        }
    }
}

/// Body of the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticsRecord {
    pub available_figis: Vec<String>,
    pub available_intervals: Vec<String>,
    pub total_records: i64,
}

impl From<StoreDiagnostics> for DiagnosticsRecord {
    fn from(value: StoreDiagnostics) -> Self {
        Self {
            available_figis: value.available_figis,
            available_intervals: value.available_intervals,
            total_records: value.total_records,
        }
    }
}
