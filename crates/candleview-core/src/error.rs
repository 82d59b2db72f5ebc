use candleview_warehouse::WarehouseError;
use thiserror::Error;

/// Validation and contract errors exposed by `candleview-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("instrument identifier cannot be empty")]
    EmptyInstrumentId,

    #[error("invalid interval '{value}', expected one of the CANDLE_INTERVAL_* codes")]
    InvalidInterval { value: String },

    #[error("epoch value {micros}us is outside the supported timestamp range")]
    TimestampOutOfRange { micros: i64 },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store could not answer; never converted into an empty result here.
    #[error("failed to {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: WarehouseError,
    },

    /// The blocking worker running a store call died before reporting back.
    #[error("failed to {operation}: store worker aborted: {message}")]
    Worker {
        operation: &'static str,
        message: String,
    },
}

impl CoreError {
    pub fn store(operation: &'static str, source: WarehouseError) -> Self {
        Self::Store { operation, source }
    }
}
