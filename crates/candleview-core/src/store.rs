//! Store seam between the catalog/query layer and the warehouse.
//!
//! [`MarketStore`] is what the catalog and the candle engine depend on;
//! [`WarehouseStore`] is the DuckDB-backed implementation. Warehouse calls are
//! blocking, so each one runs on tokio's blocking pool and is tied to the
//! awaiting future: dropping that future cancels the scan.

use std::future::Future;
use std::pin::Pin;

use candleview_warehouse::{CancelToken, QueryGuardrails, StoreDiagnostics, Warehouse, WarehouseError};
use tracing::{debug, warn};

use crate::{Candle, CoreError, Instrument};

/// Boxed future returned by [`MarketStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CoreError>> + Send + 'a>>;

/// Read access to instruments and candles.
pub trait MarketStore: Send + Sync {
    /// Instruments in normal trading with the enabled flag set, ordered by ticker.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the store cannot be reached or the query fails.
    fn enabled_instruments<'a>(&'a self) -> StoreFuture<'a, Vec<Instrument>>;

    /// Bars for one instrument and interval code, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] on store failure. Unknown identifiers are
    /// not errors; they produce an empty vector.
    fn candles<'a>(&'a self, figi: &'a str, interval: &'a str) -> StoreFuture<'a, Vec<Candle>>;

    /// Summary of the candle table.
    fn diagnostics<'a>(&'a self) -> StoreFuture<'a, StoreDiagnostics>;
}

/// [`MarketStore`] backed by the DuckDB [`Warehouse`].
#[derive(Clone)]
pub struct WarehouseStore {
    warehouse: Warehouse,
    guardrails: QueryGuardrails,
}

impl WarehouseStore {
    pub fn new(warehouse: Warehouse, guardrails: QueryGuardrails) -> Self {
        Self {
            warehouse,
            guardrails,
        }
    }

    async fn run_blocking<T, F>(&self, operation: &'static str, job: F) -> Result<T, CoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Warehouse, QueryGuardrails, &CancelToken) -> Result<T, WarehouseError>
            + Send
            + 'static,
    {
        let cancel = CancelToken::new();
        let _abandon = CancelOnDrop(cancel.clone());
        let warehouse = self.warehouse.clone();
        let guardrails = self.guardrails;

        match tokio::task::spawn_blocking(move || job(&warehouse, guardrails, &cancel)).await {
            Ok(result) => result.map_err(|source| {
                if let WarehouseError::RowLimitExceeded { max_rows } = &source {
                    warn!(operation, max_rows, "result exceeded the max_rows guardrail");
                }
                CoreError::store(operation, source)
            }),
            Err(join_error) => Err(CoreError::Worker {
                operation,
                message: join_error.to_string(),
            }),
        }
    }
}

/// Flags the blocking scan as abandoned once the awaiting future goes away.
struct CancelOnDrop(CancelToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

impl MarketStore for WarehouseStore {
    fn enabled_instruments<'a>(&'a self) -> StoreFuture<'a, Vec<Instrument>> {
        Box::pin(async move {
            let rows = self
                .run_blocking("list enabled instruments", |warehouse, guardrails, cancel| {
                    warehouse.enabled_instruments(guardrails, cancel)
                })
                .await?;

            debug!(count = rows.len(), "loaded enabled instruments");

            Ok(rows.into_iter().map(Instrument::from).collect())
        })
    }

    fn candles<'a>(&'a self, figi: &'a str, interval: &'a str) -> StoreFuture<'a, Vec<Candle>> {
        Box::pin(async move {
            let owned_figi = figi.to_owned();
            let owned_interval = interval.to_owned();
            let rows = self
                .run_blocking("query candles", move |warehouse, guardrails, cancel| {
                    warehouse.candles(&owned_figi, &owned_interval, guardrails, cancel)
                })
                .await?;

            debug!(figi, interval, count = rows.len(), "loaded candles");

            let candles = rows
                .into_iter()
                .map(Candle::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(candles)
        })
    }

    fn diagnostics<'a>(&'a self) -> StoreFuture<'a, StoreDiagnostics> {
        Box::pin(async move {
            self.run_blocking("collect store diagnostics", |warehouse, guardrails, cancel| {
                warehouse.diagnostics(guardrails, cancel)
            })
            .await
        })
    }
}
