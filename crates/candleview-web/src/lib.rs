//! # Candleview Web
//!
//! HTTP serving layer for candleview.
//!
//! ## Routes
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | Chart dashboard seeded with instruments and intervals |
//! | `GET /api/candles?figi=&interval=` | Candle series for one instrument and interval |
//! | `GET /api/instruments` | Enabled instruments in normal trading |
//! | `GET /api/intervals` | The supported interval table |
//! | `GET /api/debug` | Sample of stored identifiers, intervals and row count |
//!
//! Anything else answers `404 Page not found`. Store failures on the JSON
//! routes answer `500 {"error": "..."}`; the dashboard renders without
//! instruments instead.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use candleview_core::{
    CandleQueryEngine, Catalog, MarketStore, RequestDefaults, Warehouse, WarehouseStore,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Shared handler state. Cloned per request; everything inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub engine: CandleQueryEngine,
    pub defaults: Arc<RequestDefaults>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketStore>, defaults: RequestDefaults) -> Self {
        Self {
            catalog: Catalog::new(Arc::clone(&store)),
            engine: CandleQueryEngine::new(store),
            defaults: Arc::new(defaults),
        }
    }

    /// Open the configured DuckDB store and wire it into handler state.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Store`] when the database cannot be opened or bootstrapped.
    pub fn open(config: &ServerConfig) -> Result<Self, ServerError> {
        let warehouse = Warehouse::open(config.warehouse.clone())?;
        info!(
            db_path = %warehouse.db_path().display(),
            read_only = config.warehouse.read_only,
            max_pool_size = config.warehouse.max_pool_size,
            "candle store opened"
        );
        let store = WarehouseStore::new(warehouse, config.guardrails);
        Ok(Self::new(Arc::new(store), config.defaults.clone()))
    }
}

/// Build the application router.
///
/// Requests running past `request_timeout` are dropped, which cancels any
/// store scan still in flight.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/candles", get(routes::candles))
        .route("/api/instruments", get(routes::instruments))
        .route("/api/intervals", get(routes::intervals))
        .route("/api/debug", get(routes::debug))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
