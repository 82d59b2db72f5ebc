//! Candle query engine and request resolution.

use std::sync::Arc;

use candleview_warehouse::StoreDiagnostics;
use tracing::debug;

use crate::store::MarketStore;
use crate::{Candle, CoreError, Interval, ValidationError};

/// Instrument charted when the client does not name one.
pub const DEFAULT_FIGI: &str = "BBG004730N88";

/// Interval charted when the client does not name one.
pub const DEFAULT_INTERVAL: Interval = Interval::OneDay;

/// Values substituted for absent request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub figi: String,
    pub interval: String,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            figi: DEFAULT_FIGI.to_owned(),
            interval: DEFAULT_INTERVAL.code().to_owned(),
        }
    }
}

impl RequestDefaults {
    /// Check configured defaults: a non-empty figi and an advertised interval.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.figi.trim().is_empty() {
            return Err(ValidationError::EmptyInstrumentId);
        }
        self.interval.parse::<Interval>().map(|_| ())
    }
}

/// The (instrument, interval) pair a candle request actually runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleRequest {
    pub figi: String,
    pub interval: String,
}

impl CandleRequest {
    /// Fill absent or empty parameters from `defaults`.
    ///
    /// Present values pass through untouched: an unknown instrument or
    /// interval is a legal request that matches no rows.
    pub fn resolve(
        figi: Option<String>,
        interval: Option<String>,
        defaults: &RequestDefaults,
    ) -> Self {
        Self {
            figi: non_empty(figi).unwrap_or_else(|| defaults.figi.clone()),
            interval: non_empty(interval).unwrap_or_else(|| defaults.interval.clone()),
        }
    }

    /// Whether the interval is one of the advertised codes.
    pub fn is_advertised_interval(&self) -> bool {
        Interval::from_code(&self.interval).is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Retrieves ordered candle series from a [`MarketStore`].
#[derive(Clone)]
pub struct CandleQueryEngine {
    store: Arc<dyn MarketStore>,
}

impl CandleQueryEngine {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }

    /// Bars for `figi` at `interval`, ascending by bar start time.
    ///
    /// Inputs are not validated. Zero matching rows is `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] when the store fails; that is never
    /// reported as an empty series.
    pub async fn query_candles(&self, figi: &str, interval: &str) -> Result<Vec<Candle>, CoreError> {
        let mut candles = self.store.candles(figi, interval).await?;
        // Stable sort; a no-op for store output already in time order.
        candles.sort_by_key(|candle| candle.ts);
        if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
            debug!(
                figi,
                interval,
                count = candles.len(),
                from = %first.ts,
                to = %last.ts,
                "candle query complete"
            );
        } else {
            debug!(figi, interval, "candle query matched no rows");
        }
        Ok(candles)
    }

    pub async fn query(&self, request: &CandleRequest) -> Result<Vec<Candle>, CoreError> {
        self.query_candles(&request.figi, &request.interval).await
    }

    /// Sampled identifiers, stored interval codes and total row count.
    pub async fn diagnostics(&self) -> Result<StoreDiagnostics, CoreError> {
        self.store.diagnostics().await
    }
}
