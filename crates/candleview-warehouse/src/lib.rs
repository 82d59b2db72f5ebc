//! # Candleview Warehouse
//!
//! DuckDB-backed read access to instrument metadata and candle history.
//!
//! ## Overview
//!
//! The warehouse is the only crate that speaks SQL. It exposes three read
//! operations, all of them bounded by [`QueryGuardrails`] and interruptible
//! through a [`CancelToken`]:
//!
//! - [`Warehouse::enabled_instruments`]: instruments eligible for charting
//! - [`Warehouse::candles`]: the bar series for one instrument and interval
//! - [`Warehouse::diagnostics`]: a small summary of what the candle table holds
//!
//! Every value supplied by a caller is bound as a query parameter.
//!
//! ## Tables
//!
//! | Table | Key | Description |
//! |-------|-----|-------------|
//! | `instruments` | `figi` | Instrument metadata written by ingestion |
//! | `candles` | `(figi, interval_type, time)` | OHLCV bars written by ingestion |
//! | `schema_migrations` | `version` | Bootstrap migration ledger |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use candleview_warehouse::{CancelToken, QueryGuardrails, Warehouse, WarehouseConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open(WarehouseConfig::default())?;
//!     let bars = warehouse.candles(
//!         "BBG004730N88",
//!         "CANDLE_INTERVAL_DAY",
//!         QueryGuardrails::default(),
//!         &CancelToken::new(),
//!     )?;
//!     println!("{} bars", bars.len());
//!     Ok(())
//! }
//! ```

pub mod duckdb;
pub mod migrations;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ::duckdb::{Connection, Row, ToSql};
use thiserror::Error;

pub use duckdb::{DuckDbConnectionManager, PooledConnection};

/// Trading status value that marks an instrument as tradable.
pub const NORMAL_TRADING_STATUS: &str = "SECURITY_TRADING_STATUS_NORMAL_TRADING";

/// Upper bound on the number of distinct identifiers returned by diagnostics.
pub const DIAGNOSTIC_SAMPLE_SIZE: usize = 10;

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Query was rejected due to policy violation.
    #[error("query rejected: {0}")]
    QueryRejected(String),

    /// Query execution timed out.
    #[error("query timed out after {timeout_ms}ms")]
    QueryTimeout { timeout_ms: u64 },

    /// The result set is larger than the configured row cap.
    #[error("query returned more than {max_rows} rows")]
    RowLimitExceeded { max_rows: usize },

    /// The caller abandoned the query before it finished.
    #[error("query cancelled")]
    Cancelled,
}

/// Configuration for the warehouse database.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Root directory for candleview data.
    pub candleview_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections in the pool.
    pub max_pool_size: usize,
    /// Open the database without write access and skip schema bootstrap.
    pub read_only: bool,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        let candleview_home = resolve_candleview_home();
        let db_path = candleview_home.join("candles.duckdb");
        Self {
            candleview_home,
            db_path,
            max_pool_size: 4,
            read_only: false,
        }
    }
}

/// Guardrails for query execution to prevent resource exhaustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryGuardrails {
    /// Maximum number of rows to return.
    pub max_rows: usize,
    /// Query timeout in milliseconds.
    pub query_timeout_ms: u64,
}

impl Default for QueryGuardrails {
    fn default() -> Self {
        Self {
            max_rows: 500_000,
            query_timeout_ms: 5_000,
        }
    }
}

impl QueryGuardrails {
    fn timeout(self) -> Duration {
        Duration::from_millis(self.query_timeout_ms.max(1))
    }

    /// Validate that guardrails are within acceptable bounds.
    ///
    /// # Errors
    /// Returns [`WarehouseError::QueryRejected`] for zero limits.
    pub fn validate(self) -> Result<(), WarehouseError> {
        if self.max_rows == 0 {
            return Err(WarehouseError::QueryRejected(String::from(
                "max_rows must be greater than zero",
            )));
        }
        if self.query_timeout_ms == 0 {
            return Err(WarehouseError::QueryRejected(String::from(
                "query_timeout_ms must be greater than zero",
            )));
        }
        Ok(())
    }
}

/// Shared flag that lets the owner of a query abandon it mid-scan.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One row of the `instruments` table.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRow {
    pub figi: String,
    pub ticker: String,
    pub name: String,
    pub instrument_type: String,
    pub currency: String,
    pub lot_size: i32,
    pub min_price_increment: f64,
    pub trading_status: String,
    pub enabled: bool,
}

/// One row of the `candles` table with the bar start time in epoch microseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleRow {
    pub figi: String,
    pub time_us: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub interval_type: String,
}

/// Summary of the candle table used by the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreDiagnostics {
    /// Up to [`DIAGNOSTIC_SAMPLE_SIZE`] distinct instrument identifiers.
    pub available_figis: Vec<String>,
    pub available_intervals: Vec<String>,
    pub total_records: i64,
}

/// The main warehouse interface for candle reads.
#[derive(Clone)]
pub struct Warehouse {
    config: WarehouseConfig,
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    /// Open a warehouse with the specified configuration.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if !config.read_only {
            if let Some(parent) = config.db_path.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = DuckDbConnectionManager::open(
            config.db_path.clone(),
            config.max_pool_size,
            config.read_only,
        )?;
        let warehouse = Self { config, manager };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Ensure the tables the read path needs exist.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        if self.config.read_only {
            return Ok(());
        }
        let connection = self.manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        self.manager.db_path()
    }

    /// List instruments in normal trading that are enabled, ordered by ticker.
    ///
    /// The identifier breaks ticker ties so the order is stable.
    pub fn enabled_instruments(
        &self,
        guardrails: QueryGuardrails,
        cancel: &CancelToken,
    ) -> Result<Vec<InstrumentRow>, WarehouseError> {
        guardrails.validate()?;
        let connection = self.manager.acquire()?;
        let params: [&dyn ToSql; 1] = [&NORMAL_TRADING_STATUS];
        collect_rows(
            &connection,
            "SELECT figi, ticker, name, instrument_type, currency, lot_size, \
             min_price_increment, trading_status, enabled \
             FROM instruments \
             WHERE trading_status = ? AND enabled = TRUE \
             ORDER BY ticker, figi",
            params.as_slice(),
            guardrails,
            cancel,
            read_instrument,
        )
    }

    /// Read the bar series for one instrument and interval, oldest first.
    ///
    /// Neither argument is validated; unknown values simply match no rows.
    /// A series longer than `max_rows` is an error, never a partial result.
    pub fn candles(
        &self,
        figi: &str,
        interval_type: &str,
        guardrails: QueryGuardrails,
        cancel: &CancelToken,
    ) -> Result<Vec<CandleRow>, WarehouseError> {
        guardrails.validate()?;
        let connection = self.manager.acquire()?;
        let params: [&dyn ToSql; 2] = [&figi, &interval_type];
        collect_rows(
            &connection,
            "SELECT figi, epoch_us(time), open_price, high_price, low_price, close_price, \
             volume, interval_type \
             FROM candles \
             WHERE figi = ? AND interval_type = ? \
             ORDER BY time",
            params.as_slice(),
            guardrails,
            cancel,
            read_candle,
        )
    }

    /// Summarize the candle table: sampled identifiers, intervals, row count.
    pub fn diagnostics(
        &self,
        guardrails: QueryGuardrails,
        cancel: &CancelToken,
    ) -> Result<StoreDiagnostics, WarehouseError> {
        guardrails.validate()?;
        let connection = self.manager.acquire()?;
        let no_params: [&dyn ToSql; 0] = [];

        let figi_sql = format!(
            "SELECT DISTINCT figi FROM candles ORDER BY figi LIMIT {DIAGNOSTIC_SAMPLE_SIZE}"
        );
        let available_figis = collect_rows(
            &connection,
            figi_sql.as_str(),
            no_params.as_slice(),
            guardrails,
            cancel,
            |row| row.get::<_, String>(0),
        )?;

        let available_intervals = collect_rows(
            &connection,
            "SELECT DISTINCT interval_type FROM candles ORDER BY interval_type",
            no_params.as_slice(),
            guardrails,
            cancel,
            |row| row.get::<_, String>(0),
        )?;

        let total_records = collect_rows(
            &connection,
            "SELECT COUNT(*) FROM candles",
            no_params.as_slice(),
            guardrails,
            cancel,
            |row| row.get::<_, i64>(0),
        )?
        .into_iter()
        .next()
        .unwrap_or_default();

        Ok(StoreDiagnostics {
            available_figis,
            available_intervals,
            total_records,
        })
    }
}

fn read_instrument(row: &Row<'_>) -> Result<InstrumentRow, ::duckdb::Error> {
    Ok(InstrumentRow {
        figi: row.get(0)?,
        ticker: row.get(1)?,
        name: row.get(2)?,
        instrument_type: row.get(3)?,
        currency: row.get(4)?,
        lot_size: row.get(5)?,
        min_price_increment: row.get(6)?,
        trading_status: row.get(7)?,
        enabled: row.get(8)?,
    })
}

fn read_candle(row: &Row<'_>) -> Result<CandleRow, ::duckdb::Error> {
    Ok(CandleRow {
        figi: row.get(0)?,
        time_us: row.get(1)?,
        open: row.get(2)?,
        high: row.get(3)?,
        low: row.get(4)?,
        close: row.get(5)?,
        volume: row.get(6)?,
        interval_type: row.get(7)?,
    })
}

/// Run a parameterized SELECT and map each row, honoring guardrails and cancellation.
///
/// Reading a row beyond `max_rows` fails the whole query.
fn collect_rows<T, F>(
    connection: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
    guardrails: QueryGuardrails,
    cancel: &CancelToken,
    mut map: F,
) -> Result<Vec<T>, WarehouseError>
where
    F: FnMut(&Row<'_>) -> Result<T, ::duckdb::Error>,
{
    let started = Instant::now();
    ensure_live(started, guardrails.timeout(), cancel)?;

    let mut statement = connection.prepare(sql)?;
    let mut cursor = statement.query(params)?;
    let mut rows = Vec::new();

    while let Some(row) = cursor.next()? {
        ensure_live(started, guardrails.timeout(), cancel)?;

        if rows.len() >= guardrails.max_rows {
            return Err(WarehouseError::RowLimitExceeded {
                max_rows: guardrails.max_rows,
            });
        }

        rows.push(map(row)?);
    }

    ensure_live(started, guardrails.timeout(), cancel)?;

    Ok(rows)
}

/// Fail if the query was cancelled or has exceeded its timeout.
fn ensure_live(
    started: Instant,
    timeout: Duration,
    cancel: &CancelToken,
) -> Result<(), WarehouseError> {
    if cancel.is_cancelled() {
        return Err(WarehouseError::Cancelled);
    }
    if started.elapsed() > timeout {
        return Err(WarehouseError::QueryTimeout {
            timeout_ms: timeout.as_millis().min(u128::from(u64::MAX)) as u64,
        });
    }
    Ok(())
}

/// Resolve the candleview home directory from environment or default.
fn resolve_candleview_home() -> PathBuf {
    if let Some(path) = env::var_os("CANDLEVIEW_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".candleview");
    }

    PathBuf::from(".candleview")
}
