//! # Candleview Core
//!
//! Catalog, interval table and candle query contracts for the candleview
//! charting backend.
//!
//! ## Overview
//!
//! - **Domain models** for instruments, candles, intervals and UTC timestamps
//! - **Catalog** listing chartable instruments and the supported intervals
//! - **Candle query engine** resolving request defaults and returning ordered series
//! - **Store seam** ([`MarketStore`]) with a DuckDB-backed implementation
//! - **Wire records** matching the JSON the chart client consumes
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`candles`] | Request resolution and the candle query engine |
//! | [`catalog`] | Enabled instruments and supported intervals |
//! | [`domain`] | Domain models (Instrument, Candle, Interval, UtcDateTime) |
//! | [`error`] | Core error types |
//! | [`store`] | Store trait and warehouse adapter |
//! | [`wire`] | Client-facing JSON records |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use candleview_core::{CandleQueryEngine, QueryGuardrails, Warehouse, WarehouseConfig, WarehouseStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open(WarehouseConfig::default())?;
//!     let store = Arc::new(WarehouseStore::new(warehouse, QueryGuardrails::default()));
//!     let engine = CandleQueryEngine::new(store);
//!
//!     let candles = engine.query_candles("BBG004730N88", "CANDLE_INTERVAL_DAY").await?;
//!     println!("{} bars", candles.len());
//!     Ok(())
//! }
//! ```

pub mod candles;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod store;
pub mod wire;

pub use candles::{CandleQueryEngine, CandleRequest, RequestDefaults, DEFAULT_FIGI, DEFAULT_INTERVAL};
pub use catalog::Catalog;
pub use domain::{Candle, Instrument, Interval, IntervalOption, UtcDateTime, SUPPORTED_INTERVALS};
pub use error::{CoreError, ValidationError};
pub use store::{MarketStore, StoreFuture, WarehouseStore};
pub use wire::{serialize_price, CandleRecord, DiagnosticsRecord};

pub use candleview_warehouse::{
    QueryGuardrails, StoreDiagnostics, Warehouse, WarehouseConfig, WarehouseError,
};
