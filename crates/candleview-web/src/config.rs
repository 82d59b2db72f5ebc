//! Command-line and environment configuration for the candleview server.
//!
//! # Options
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--bind` | `CANDLEVIEW_BIND` | `0.0.0.0:8080` | Listen address |
//! | `--db-path` | `CANDLEVIEW_DB_PATH` | `$CANDLEVIEW_HOME/candles.duckdb` | DuckDB file |
//! | `--read-only` | | `false` | Open the store read-only, skip bootstrap |
//! | `--max-pool-size` | | `4` | Idle connections kept in the pool |
//! | `--default-figi` | | `BBG004730N88` | Instrument used when `figi` is absent |
//! | `--default-interval` | | `CANDLE_INTERVAL_DAY` | Interval used when `interval` is absent |
//! | `--query-timeout-ms` | | `5000` | Per-query guardrail |
//! | `--max-rows` | | `500000` | Per-query row cap |
//! | `--request-timeout-ms` | | `10000` | Whole-request deadline |
//! | `--log-filter` | `RUST_LOG` | `info` | tracing filter directives |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use candleview_core::{QueryGuardrails, RequestDefaults, WarehouseConfig, DEFAULT_FIGI};
use clap::Parser;

use crate::error::ServerError;

/// Candle charting backend.
#[derive(Debug, Parser)]
#[command(
    name = "candleview",
    version,
    about = "Serve candle history and a chart dashboard from a DuckDB store"
)]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "CANDLEVIEW_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// DuckDB database file. Defaults to `candles.duckdb` under the candleview home.
    #[arg(long, env = "CANDLEVIEW_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Open the database read-only and skip schema bootstrap.
    #[arg(long)]
    pub read_only: bool,

    #[arg(long, default_value_t = 4)]
    pub max_pool_size: usize,

    /// Instrument charted when a request omits `figi`.
    #[arg(long, default_value = DEFAULT_FIGI)]
    pub default_figi: String,

    /// Interval charted when a request omits `interval`.
    #[arg(long, default_value = "CANDLE_INTERVAL_DAY")]
    pub default_interval: String,

    #[arg(long, default_value_t = 5_000)]
    pub query_timeout_ms: u64,

    #[arg(long, default_value_t = 500_000)]
    pub max_rows: usize,

    /// Deadline for a whole HTTP request, store round-trip included.
    #[arg(long, default_value_t = 10_000)]
    pub request_timeout_ms: u64,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub warehouse: WarehouseConfig,
    pub guardrails: QueryGuardrails,
    pub defaults: RequestDefaults,
    pub request_timeout: Duration,
    pub log_filter: String,
}

impl ServerConfig {
    /// Build and validate the runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] for zero limits and
    /// [`ServerError::Validation`] for unusable request defaults.
    pub fn from_cli(cli: Cli) -> Result<Self, ServerError> {
        if cli.max_pool_size == 0 {
            return Err(ServerError::Config(String::from(
                "max_pool_size must be greater than zero",
            )));
        }
        if cli.request_timeout_ms == 0 {
            return Err(ServerError::Config(String::from(
                "request_timeout_ms must be greater than zero",
            )));
        }

        let guardrails = QueryGuardrails {
            max_rows: cli.max_rows,
            query_timeout_ms: cli.query_timeout_ms,
        };
        guardrails
            .validate()
            .map_err(|error| ServerError::Config(error.to_string()))?;

        let defaults = RequestDefaults {
            figi: cli.default_figi,
            interval: cli.default_interval,
        };
        defaults.validate()?;

        let mut warehouse = WarehouseConfig::default();
        if let Some(db_path) = cli.db_path {
            warehouse.db_path = db_path;
        }
        warehouse.max_pool_size = cli.max_pool_size;
        warehouse.read_only = cli.read_only;

        Ok(Self {
            bind: cli.bind,
            warehouse,
            guardrails,
            defaults,
            request_timeout: Duration::from_millis(cli.request_timeout_ms),
            log_filter: cli.log_filter,
        })
    }
}
