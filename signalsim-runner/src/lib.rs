//! signalsim runner — everything around the core simulation.
//!
//! This crate builds on `signalsim-core` to provide:
//! - CSV loading with configurable columns and lenient timestamp parsing
//! - Deterministic sample data generation
//! - TOML run configuration and content-addressed run ids
//! - Single-backtest runner with provenance
//! - JSON / CSV / text / Markdown artifacts
//! - Parallel parameter sweeps

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod sample;
pub mod summary;
pub mod sweep;

pub use config::{ConfigError, DataConfig, OutputConfig, RunConfig};
pub use data_loader::{dataset_hash, load_csv, load_csv_reader, ColumnNames, LoadError};
pub use export::{export_json, import_json, load_artifacts, save_artifacts};
pub use runner::{run_backtest, run_backtest_on_bars, BacktestReport, RunError, SCHEMA_VERSION};
pub use sample::{generate_sample_bars, write_sample_csv};
pub use summary::render_summary;
pub use sweep::{sweep_configs, sweep_cost_rates, ParamSweep, SweepPoint};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn backtest_report_is_send_sync() {
        assert_send::<BacktestReport>();
        assert_sync::<BacktestReport>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
        assert_send::<ColumnNames>();
        assert_sync::<ColumnNames>();
    }

    #[test]
    fn sweep_types_are_send_sync() {
        assert_send::<SweepPoint>();
        assert_sync::<SweepPoint>();
        assert_send::<ParamSweep<'static>>();
        assert_sync::<ParamSweep<'static>>();
    }

    #[test]
    fn error_types_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
