//! Immutable simulation configuration shared by the simulator and the aggregator.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Default starting capital.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

/// Default transaction cost per side (0.03%).
pub const DEFAULT_COST_RATE: f64 = 0.0003;

/// Parameters for a single backtest run.
///
/// Passed by value into both [`crate::engine::simulate`] and
/// [`crate::stats::aggregate`]; nothing mutates it during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub initial_capital: f64,
    /// Fraction of notional charged on every entry and every exit.
    pub cost_rate: f64,
}

impl SimConfig {
    pub fn new(initial_capital: f64, cost_rate: f64) -> Self {
        Self {
            initial_capital,
            cost_rate,
        }
    }

    /// Check capital is positive and finite and the cost rate lies in `[0, 1)`.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "initial_capital must be positive and finite, got {}",
                self.initial_capital
            )));
        }
        if !(0.0..1.0).contains(&self.cost_rate) {
            return Err(SimError::InvalidConfig(format!(
                "cost_rate must be in [0, 1), got {}",
                self.cost_rate
            )));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPITAL, DEFAULT_COST_RATE)
    }
}
