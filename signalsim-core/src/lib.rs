//! signalsim core — single-asset signal backtesting.
//!
//! Two components used in sequence:
//! - [`engine`]: walks a time-ordered (timestamp, price, signal) series once,
//!   tracking one position and producing trades, per-day P&L and an equity
//!   curve.
//! - [`stats`]: turns the simulator output into summary metrics.
//!
//! No I/O happens here; loading, persistence and rendering live in
//! `signalsim-runner`.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod stats;

pub use config::SimConfig;
pub use domain::{Bar, DailyPnl, EquityPoint, EquitySnapshot, PositionDirection, Trade};
pub use engine::{simulate, simulate_with, SimulationOutput, TargetPolicy};
pub use error::SimError;
pub use stats::{aggregate, Results};

/// Simulate `bars` and aggregate the output in one call.
pub fn run(bars: &[Bar], config: &SimConfig) -> Result<Results, SimError> {
    let output = simulate(bars, config)?;
    Ok(aggregate(&output, config))
}
