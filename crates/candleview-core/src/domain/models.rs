use candleview_warehouse::{CandleRow, InstrumentRow};
use serde::Serialize;

use crate::wire::serialize_price;
use crate::{UtcDateTime, ValidationError};

/// Canonical instrument metadata as written by ingestion.
///
/// Serialized with PascalCase keys, the shape the chart client reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instrument {
    /// Provider-assigned FIGI-equivalent identifier.
    pub figi: String,
    pub ticker: String,
    pub name: String,
    pub instrument_type: String,
    pub currency: String,
    pub lot_size: i32,
    #[serde(serialize_with = "serialize_price")]
    pub min_price_increment: f64,
    pub trading_status: String,
    pub enabled: bool,
}

impl From<InstrumentRow> for Instrument {
    fn from(row: InstrumentRow) -> Self {
        Self {
            figi: row.figi,
            ticker: row.ticker,
            name: row.name,
            instrument_type: row.instrument_type,
            currency: row.currency,
            lot_size: row.lot_size,
            min_price_increment: row.min_price_increment,
            trading_status: row.trading_status,
            enabled: row.enabled,
        }
    }
}

/// One OHLCV bar keyed by (figi, interval, ts).
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub figi: String,
    /// Bar start time.
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    /// Interval code exactly as stored.
    pub interval: String,
}

impl TryFrom<CandleRow> for Candle {
    type Error = ValidationError;

    fn try_from(row: CandleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            figi: row.figi,
            ts: UtcDateTime::from_unix_micros(row.time_us)?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            interval: row.interval_type,
        })
    }
}
