//! Parameter sweeps: one dataset, many simulation configs.
//!
//! Runs are independent, so they execute in parallel with rayon. Output
//! order always matches input order and each report is identical to what a
//! serial run of the same config produces.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use signalsim_core::{Bar, SimConfig};

use crate::runner::{run_backtest_on_bars, BacktestReport, RunError};

/// One cost-rate sweep result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub cost_rate: f64,
    pub report: BacktestReport,
}

/// Sweep executor over a fixed set of bars.
pub struct ParamSweep<'a> {
    bars: &'a [Bar],
    parallel: bool,
}

impl<'a> ParamSweep<'a> {
    pub fn new(bars: &'a [Bar]) -> Self {
        Self {
            bars,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every config. Fails on the first invalid config.
    pub fn run(&self, configs: &[SimConfig]) -> Result<Vec<BacktestReport>, RunError> {
        log::info!(
            "sweep: {} configs over {} bars ({})",
            configs.len(),
            self.bars.len(),
            if self.parallel { "parallel" } else { "serial" }
        );
        if self.parallel {
            configs
                .par_iter()
                .map(|config| run_backtest_on_bars(self.bars, config))
                .collect()
        } else {
            configs
                .iter()
                .map(|config| run_backtest_on_bars(self.bars, config))
                .collect()
        }
    }
}

/// Run `configs` against `bars` in parallel.
pub fn sweep_configs(bars: &[Bar], configs: &[SimConfig]) -> Result<Vec<BacktestReport>, RunError> {
    ParamSweep::new(bars).run(configs)
}

/// Vary only the cost rate of `base`.
pub fn sweep_cost_rates(
    bars: &[Bar],
    base: &SimConfig,
    cost_rates: &[f64],
) -> Result<Vec<SweepPoint>, RunError> {
    let configs: Vec<SimConfig> = cost_rates
        .iter()
        .map(|&rate| SimConfig::new(base.initial_capital, rate))
        .collect();
    let reports = sweep_configs(bars, &configs)?;
    Ok(cost_rates
        .iter()
        .zip(reports)
        .map(|(&cost_rate, report)| SweepPoint { cost_rate, report })
        .collect())
}

/// The point with the highest final capital (first wins ties).
pub fn best_by_final_capital(points: &[SweepPoint]) -> Option<&SweepPoint> {
    points.iter().reduce(|best, p| {
        if p.report.results.final_capital > best.report.results.final_capital {
            p
        } else {
            best
        }
    })
}
