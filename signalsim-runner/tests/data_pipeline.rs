//! Integration tests for the runner's data pipeline.
//!
//! These tests write CSV files to disk, load them back through the loader
//! and run backtests on the result:
//! - sample data survives the write/load cycle
//! - the two-bar reference scenario matches hand-computed numbers
//! - unsorted input and bad timestamps are handled before simulation

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, NaiveDateTime};
use signalsim_core::SimConfig;
use signalsim_runner::data_loader::{dataset_hash, load_csv, ColumnNames, LoadError};
use signalsim_runner::runner::run_backtest_on_bars;
use signalsim_runner::sample::{generate_sample_bars, write_sample_csv};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_dir() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "signalsim_runner_pipeline_{}_{id}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

#[test]
fn sample_csv_roundtrip_preserves_bars() {
    let dir = temp_dir();
    let path = dir.join("sample.csv");
    let bars = generate_sample_bars(300, 42, start());
    write_sample_csv(&path, &bars).unwrap();

    let loaded = load_csv(&path, &ColumnNames::default()).unwrap();
    assert_eq!(loaded.len(), bars.len());
    for (a, b) in loaded.iter().zip(&bars) {
        assert_eq!(a.timestamp, b.timestamp);
        assert_eq!(a.signal, b.signal);
        // Shortest round-trip float formatting: exact.
        assert_eq!(a.price, b.price);
    }
    assert_eq!(dataset_hash(&loaded), dataset_hash(&bars));
}

#[test]
fn sample_backtest_trades_and_balances() {
    let bars = generate_sample_bars(1000, 42, start());
    let report = run_backtest_on_bars(&bars, &SimConfig::default()).unwrap();
    let r = &report.results;

    assert!(r.total_trades > 0);
    assert!(r.winning_trades + r.losing_trades <= r.total_trades);
    assert_eq!(r.equity_curve.len(), 1000);
    assert_eq!(r.n_days, 1);

    let round_trip: f64 = r.trades.iter().map(|t| t.round_trip_pnl()).sum();
    assert!((round_trip - (r.final_capital - r.initial_capital)).abs() < 1e-6);
}

#[test]
fn reference_scenario_from_csv() {
    let dir = temp_dir();
    let path = dir.join("two_bars.csv");
    std::fs::write(
        &path,
        "datetime,close,signal\n01-01-2024 09:15,100,1\n01-01-2024 09:16,110,0\n",
    )
    .unwrap();

    let bars = load_csv(&path, &ColumnNames::default()).unwrap();
    let report = run_backtest_on_bars(&bars, &SimConfig::new(10_000.0, 0.0003)).unwrap();
    let r = &report.results;

    assert_eq!(r.total_trades, 1);
    assert!((r.trades[0].net_pnl - 996.7009).abs() < 1e-6);
    assert!((r.final_capital - 10_993.7009).abs() < 1e-6);
    assert!((r.avg_hold_seconds - 60.0).abs() < 1e-9);
    assert!((r.avg_hold_minutes - 1.0).abs() < 1e-9);
}

#[test]
fn unsorted_rows_are_sorted_before_simulation() {
    let dir = temp_dir();
    let path = dir.join("unsorted.csv");
    std::fs::write(
        &path,
        "datetime,close,signal\n\
         01-01-2024 09:16,110,0\n\
         01-01-2024 09:15,100,1\n",
    )
    .unwrap();

    let bars = load_csv(&path, &ColumnNames::default()).unwrap();
    assert_eq!(bars[0].price, 100.0);
    let report = run_backtest_on_bars(&bars, &SimConfig::new(10_000.0, 0.0)).unwrap();
    assert!((report.results.final_capital - 11_000.0).abs() < 1e-9);
}

#[test]
fn unparseable_timestamps_still_simulate() {
    let dir = temp_dir();
    let path = dir.join("bad_ts.csv");
    std::fs::write(
        &path,
        "datetime,close,signal\n\
         01-01-2024 09:15,100,1\n\
         not a date,105,0\n\
         01-01-2024 09:17,110,0\n",
    )
    .unwrap();

    let bars = load_csv(&path, &ColumnNames::default()).unwrap();
    assert_eq!(bars.len(), 3);
    assert_eq!(bars[2].timestamp, None);
    let report = run_backtest_on_bars(&bars, &SimConfig::new(10_000.0, 0.0)).unwrap();
    assert_eq!(report.results.total_trades, 1);
}

#[test]
fn missing_file_reports_path() {
    let err = load_csv(
        &PathBuf::from("/nonexistent/signalsim.csv"),
        &ColumnNames::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("signalsim.csv"));
}
