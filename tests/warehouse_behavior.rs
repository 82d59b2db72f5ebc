//! Behavior-driven tests for the candle warehouse.
//!
//! These tests verify what the read path returns for realistic store
//! content written by an ingestion process, focusing on ordering,
//! filtering and empty results.

use std::path::{Path, PathBuf};

use candleview_warehouse::migrations::apply_migrations;
use candleview_warehouse::{
    CancelToken, QueryGuardrails, Warehouse, WarehouseConfig, WarehouseError,
    NORMAL_TRADING_STATUS,
};
use duckdb::Connection;
use tempfile::tempdir;

/// Write rows the way ingestion would, then release the file.
fn seed(dir: &Path, sql: &str) -> PathBuf {
    let db_path = dir.join("candles.duckdb");
    let connection = Connection::open(&db_path).expect("open seed connection");
    apply_migrations(&connection).expect("bootstrap schema");
    connection.execute_batch(sql).expect("seed rows");
    drop(connection);
    db_path
}

fn open(dir: &Path, db_path: PathBuf, read_only: bool) -> Warehouse {
    Warehouse::open(WarehouseConfig {
        candleview_home: dir.to_path_buf(),
        db_path,
        max_pool_size: 2,
        read_only,
    })
    .expect("warehouse open")
}

// =============================================================================
// Candles
// =============================================================================

#[test]
fn when_candles_are_stored_out_of_order_they_come_back_ascending() {
    // Given: bars for one instrument inserted newest first, plus noise
    let temp = tempdir().expect("tempdir");
    let db_path = seed(
        temp.path(),
        "INSERT INTO candles VALUES \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-03 00:00:00+00', 3, 4, 3, 4, 30, 'CANDLE_INTERVAL_DAY'), \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-01 00:00:00+00', 1, 2, 1, 2, 10, 'CANDLE_INTERVAL_DAY'), \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-02 00:00:00+00', 2, 3, 2, 3, 20, 'CANDLE_INTERVAL_DAY'), \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-02 00:00:00+00', 9, 9, 9, 9, 99, 'CANDLE_INTERVAL_HOUR'), \
         ('BBG000B9XRY4', TIMESTAMPTZ '2024-01-02 00:00:00+00', 8, 8, 8, 8, 88, 'CANDLE_INTERVAL_DAY');",
    );
    let warehouse = open(temp.path(), db_path, false);

    // When: the daily series is requested
    let result = warehouse
        .candles(
            "BBG004730N88",
            "CANDLE_INTERVAL_DAY",
            QueryGuardrails::default(),
            &CancelToken::new(),
        )
        .expect("query should succeed");

    // Then: only matching bars, strictly ascending, with mapped OHLCV
    let times: Vec<i64> = result.iter().map(|row| row.time_us).collect();
    assert_eq!(
        times,
        vec![
            1_704_067_200_000_000,
            1_704_153_600_000_000,
            1_704_240_000_000_000
        ]
    );
    assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(result.iter().all(|row| row.figi == "BBG004730N88"));
    assert!(result
        .iter()
        .all(|row| row.interval_type == "CANDLE_INTERVAL_DAY"));
    assert_eq!(result[1].volume, 20);
    assert_eq!(result[1].close, 3.0);
}

#[test]
fn when_nothing_matches_the_series_is_empty_not_an_error() {
    // Given: a store with one bar
    let temp = tempdir().expect("tempdir");
    let db_path = seed(
        temp.path(),
        "INSERT INTO candles VALUES \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-02 00:00:00+00', 100, 110, 95, 105, 12345, 'CANDLE_INTERVAL_DAY');",
    );
    let warehouse = open(temp.path(), db_path, false);

    // When / Then: unknown instrument and unknown interval both yield zero rows
    for (figi, interval) in [
        ("UNKNOWN", "CANDLE_INTERVAL_DAY"),
        ("BBG004730N88", "CANDLE_INTERVAL_7_MIN"),
        ("", ""),
    ] {
        let result = warehouse
            .candles(figi, interval, QueryGuardrails::default(), &CancelToken::new())
            .expect("query should succeed");
        assert!(result.is_empty(), "{figi}/{interval}");
    }
}

#[test]
fn bar_times_written_with_an_offset_are_read_as_the_same_instant() {
    // Given: one bar written as 03:00 at +03, i.e. midnight UTC
    let temp = tempdir().expect("tempdir");
    let db_path = seed(
        temp.path(),
        "INSERT INTO candles VALUES \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-02 03:00:00+03', 100, 110, 95, 105, 12345, 'CANDLE_INTERVAL_DAY');",
    );
    let warehouse = open(temp.path(), db_path, false);

    // When
    let result = warehouse
        .candles(
            "BBG004730N88",
            "CANDLE_INTERVAL_DAY",
            QueryGuardrails::default(),
            &CancelToken::new(),
        )
        .expect("query should succeed");

    // Then: the epoch value is the UTC instant, not the local wall clock
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].time_us, 1_704_153_600_000_000);
}

#[test]
fn when_a_series_exceeds_the_row_cap_the_query_fails_instead_of_truncating() {
    // Given: three daily bars
    let temp = tempdir().expect("tempdir");
    let db_path = seed(
        temp.path(),
        "INSERT INTO candles VALUES \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-01 00:00:00+00', 1, 1, 1, 1, 1, 'CANDLE_INTERVAL_DAY'), \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-02 00:00:00+00', 2, 2, 2, 2, 2, 'CANDLE_INTERVAL_DAY'), \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-03 00:00:00+00', 3, 3, 3, 3, 3, 'CANDLE_INTERVAL_DAY');",
    );
    let warehouse = open(temp.path(), db_path, false);
    let capped = QueryGuardrails {
        max_rows: 2,
        ..QueryGuardrails::default()
    };

    // When: the cap is below the series length
    let error = warehouse
        .candles("BBG004730N88", "CANDLE_INTERVAL_DAY", capped, &CancelToken::new())
        .expect_err("over-cap series must not be served");

    // Then: the failure names the cap, and an exact fit is still served
    assert!(matches!(error, WarehouseError::RowLimitExceeded { max_rows: 2 }));
    let exact = warehouse
        .candles(
            "BBG004730N88",
            "CANDLE_INTERVAL_DAY",
            QueryGuardrails {
                max_rows: 3,
                ..QueryGuardrails::default()
            },
            &CancelToken::new(),
        )
        .expect("series at the cap should succeed");
    assert_eq!(exact.len(), 3);
}

// =============================================================================
// Instruments
// =============================================================================

#[test]
fn only_enabled_instruments_in_normal_trading_are_listed_by_ticker() {
    // Given: a mix of eligible, disabled and halted instruments
    let temp = tempdir().expect("tempdir");
    let db_path = seed(
        temp.path(),
        "INSERT INTO instruments VALUES \
         ('F3', 'YNDX', 'Yandex', 'share', 'rub', 1, 0.2, 'SECURITY_TRADING_STATUS_NORMAL_TRADING', TRUE), \
         ('F1', 'SBER', 'Sberbank', 'share', 'rub', 10, 0.01, 'SECURITY_TRADING_STATUS_NORMAL_TRADING', TRUE), \
         ('F0', 'SBER', 'Sberbank pref', 'share', 'rub', 10, 0.01, 'SECURITY_TRADING_STATUS_NORMAL_TRADING', TRUE), \
         ('F2', 'GAZP', 'Gazprom', 'share', 'rub', 10, 0.01, 'SECURITY_TRADING_STATUS_NORMAL_TRADING', FALSE), \
         ('F4', 'AFLT', 'Aeroflot', 'share', 'rub', 10, 0.01, 'SECURITY_TRADING_STATUS_NOT_AVAILABLE_FOR_TRADING', TRUE);",
    );
    let warehouse = open(temp.path(), db_path, false);

    // When: enabled instruments are listed
    let result = warehouse
        .enabled_instruments(QueryGuardrails::default(), &CancelToken::new())
        .expect("listing should succeed");

    // Then: ticker order, figi breaking the tie, no ineligible rows
    let figis: Vec<&str> = result.iter().map(|row| row.figi.as_str()).collect();
    assert_eq!(figis, vec!["F0", "F1", "F3"]);
    assert!(result
        .iter()
        .all(|row| row.enabled && row.trading_status == NORMAL_TRADING_STATUS));
    assert_eq!(result[0].lot_size, 10);
    assert_eq!(result[2].min_price_increment, 0.2);
}

#[test]
fn empty_store_lists_no_instruments() {
    let temp = tempdir().expect("tempdir");
    let warehouse = open(temp.path(), temp.path().join("fresh.duckdb"), false);

    let result = warehouse
        .enabled_instruments(QueryGuardrails::default(), &CancelToken::new())
        .expect("listing should succeed");

    assert!(result.is_empty());
}

// =============================================================================
// Diagnostics and access modes
// =============================================================================

#[test]
fn diagnostics_sample_at_most_ten_instruments() {
    // Given: twelve instruments with one bar each, across two intervals
    let temp = tempdir().expect("tempdir");
    let mut sql = String::from("INSERT INTO candles VALUES ");
    let values: Vec<String> = (0..12)
        .map(|index| {
            let interval = if index % 2 == 0 {
                "CANDLE_INTERVAL_DAY"
            } else {
                "CANDLE_INTERVAL_HOUR"
            };
            format!("('F{index:02}', TIMESTAMPTZ '2024-01-02 00:00:00+00', 1, 1, 1, 1, 1, '{interval}')")
        })
        .collect();
    sql.push_str(&values.join(", "));
    sql.push(';');
    let db_path = seed(temp.path(), &sql);
    let warehouse = open(temp.path(), db_path, false);

    // When
    let diagnostics = warehouse
        .diagnostics(QueryGuardrails::default(), &CancelToken::new())
        .expect("diagnostics should succeed");

    // Then
    assert_eq!(diagnostics.available_figis.len(), 10);
    assert_eq!(
        diagnostics.available_intervals,
        vec!["CANDLE_INTERVAL_DAY", "CANDLE_INTERVAL_HOUR"]
    );
    assert_eq!(diagnostics.total_records, 12);
}

#[test]
fn read_only_open_serves_existing_data() {
    // Given: a store populated by another process
    let temp = tempdir().expect("tempdir");
    let db_path = seed(
        temp.path(),
        "INSERT INTO candles VALUES \
         ('BBG004730N88', TIMESTAMPTZ '2024-01-02 00:00:00+00', 100, 110, 95, 105, 12345, 'CANDLE_INTERVAL_DAY');",
    );

    // When: it is opened without write access
    let warehouse = open(temp.path(), db_path.clone(), true);

    // Then: reads work and the path is reported
    let result = warehouse
        .candles(
            "BBG004730N88",
            "CANDLE_INTERVAL_DAY",
            QueryGuardrails::default(),
            &CancelToken::new(),
        )
        .expect("read-only query should succeed");
    assert_eq!(result.len(), 1);
    assert_eq!(warehouse.db_path(), db_path.as_path());
}
