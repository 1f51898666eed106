//! Backtest runner — wires together loading, simulation, and aggregation.
//!
//! Two entry points:
//! - `run_backtest()`: loads the CSV named in a [`RunConfig`], then runs. Used by the CLI.
//! - `run_backtest_on_bars()`: takes pre-loaded bars, no I/O. Used by sweeps and tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use signalsim_core::{Bar, Results, SimConfig, SimError};

use crate::config::{run_id, ConfigError, RunConfig};
use crate::data_loader::{dataset_hash, load_csv, LoadError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("simulation error: {0}")]
    Simulation(#[from] SimError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run, with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: String,
    pub dataset_hash: String,
    pub bar_count: usize,
    /// Source CSV, if the bars came from a file.
    pub data_path: Option<String>,
    pub config: SimConfig,
    pub results: Results,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Load the configured CSV and run a backtest on it.
pub fn run_backtest(config: &RunConfig) -> Result<BacktestReport, RunError> {
    config.validate()?;
    let bars = load_csv(&config.data.path, &config.data.columns)?;
    let mut report = run_backtest_on_bars(&bars, &config.simulation)?;
    report.data_path = Some(config.data.path.display().to_string());
    Ok(report)
}

/// Run a backtest on pre-loaded bars — no I/O.
pub fn run_backtest_on_bars(bars: &[Bar], config: &SimConfig) -> Result<BacktestReport, RunError> {
    let hash = dataset_hash(bars);
    let results = signalsim_core::run(bars, config)?;

    log::info!(
        "backtest: {} bars, {} trades, final capital {:.2} ({:+.2}%)",
        bars.len(),
        results.total_trades,
        results.final_capital,
        results.final_returns
    );

    Ok(BacktestReport {
        schema_version: SCHEMA_VERSION,
        run_id: run_id(config, &hash),
        dataset_hash: hash,
        bar_count: bars.len(),
        data_path: None,
        config: *config,
        results,
    })
}
