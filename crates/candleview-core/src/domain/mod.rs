//! # Domain Models
//!
//! Canonical domain types for candleview.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Instrument`] | Instrument metadata |
//! | [`Candle`] | OHLCV bar with UTC start time |
//! | [`Interval`] | One of the 13 supported charting granularities |
//! | [`IntervalOption`] | Interval as advertised to clients |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Instruments and candles are read-only views of rows written by the
//! ingestion pipeline; they are mapped, not re-validated.

mod interval;
mod models;
mod timestamp;

pub use interval::{Interval, IntervalOption, SUPPORTED_INTERVALS};
pub use models::{Candle, Instrument};
pub use timestamp::UtcDateTime;
