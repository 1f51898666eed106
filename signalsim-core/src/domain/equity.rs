//! Equity curve points.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Mark-to-market state recorded at every bar, before any transition on
/// that bar is executed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    pub bar: usize,
    pub timestamp: Option<NaiveDateTime>,
    pub equity: f64,
    pub price: f64,
    pub signal: f64,
    /// Signed position held going into the bar.
    pub position: f64,
}

/// An equity snapshot annotated with drawdown information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    #[serde(flatten)]
    pub snapshot: EquitySnapshot,
    pub running_max: f64,
    /// `(equity − running_max) / running_max × 100`; zero or negative.
    pub drawdown_pct: f64,
}
