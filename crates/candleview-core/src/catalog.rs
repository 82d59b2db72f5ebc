//! Instrument and interval catalog.

use std::sync::Arc;

use crate::store::MarketStore;
use crate::{CoreError, Instrument, IntervalOption, SUPPORTED_INTERVALS};

/// Read-only listing of chartable instruments and supported intervals.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn MarketStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }

    /// Instruments in normal trading with the enabled flag set, sorted by ticker.
    ///
    /// An empty store yields an empty vector. Store failures are returned
    /// as-is; deciding whether to degrade is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] when the store cannot be read.
    pub async fn list_enabled_instruments(&self) -> Result<Vec<Instrument>, CoreError> {
        self.store.enabled_instruments().await
    }

    /// The fixed interval table in declaration order.
    pub fn list_supported_intervals(&self) -> &'static [IntervalOption] {
        &SUPPORTED_INTERVALS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreFuture;
    use crate::Candle;
    use candleview_warehouse::StoreDiagnostics;

    struct EmptyStore;

    impl MarketStore for EmptyStore {
        fn enabled_instruments<'a>(&'a self) -> StoreFuture<'a, Vec<Instrument>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn candles<'a>(&'a self, _: &'a str, _: &'a str) -> StoreFuture<'a, Vec<Candle>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn diagnostics<'a>(&'a self) -> StoreFuture<'a, StoreDiagnostics> {
            Box::pin(async { Ok(StoreDiagnostics::default()) })
        }
    }

    #[tokio::test]
    async fn empty_store_lists_no_instruments() {
        let catalog = Catalog::new(Arc::new(EmptyStore));
        let instruments = catalog
            .list_enabled_instruments()
            .await
            .expect("listing should succeed");
        assert!(instruments.is_empty());
    }

    #[test]
    fn interval_listing_is_stable_across_calls() {
        let catalog = Catalog::new(Arc::new(EmptyStore));
        let first = catalog.list_supported_intervals();
        let second = catalog.list_supported_intervals();
        assert_eq!(first, second);
        assert_eq!(first.len(), 13);
        assert_eq!(first[10].value, "CANDLE_INTERVAL_DAY");
    }
}
