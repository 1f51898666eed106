//! Trade — a completed round trip.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::position::PositionDirection;

/// A closed position: entry → exit.
///
/// `transaction_cost` and `net_pnl` carry the exit-side charge only. The
/// entry charge was taken from capital when the position opened and is kept
/// separately in `entry_cost`; [`Trade::round_trip_pnl`] includes both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    // ── Entry ──
    pub entry_bar: usize,
    pub entry_timestamp: Option<NaiveDateTime>,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_bar: usize,
    pub exit_timestamp: Option<NaiveDateTime>,
    pub exit_price: f64,

    // ── Size ──
    pub direction: PositionDirection,
    /// Absolute signal magnitude held.
    pub size: f64,
    /// Capital committed at entry: `capital × size`.
    pub notional: f64,

    // ── PnL ──
    pub entry_cost: f64,
    pub gross_pnl: f64,
    pub transaction_cost: f64,
    pub net_pnl: f64,
}

impl Trade {
    /// Time between entry and exit, when both timestamps are known.
    pub fn hold_duration(&self) -> Option<Duration> {
        match (self.entry_timestamp, self.exit_timestamp) {
            (Some(entry), Some(exit)) => Some(exit - entry),
            _ => None,
        }
    }

    /// Holding period in (fractional) seconds.
    pub fn hold_seconds(&self) -> Option<f64> {
        self.hold_duration()
            .map(|d| d.num_milliseconds() as f64 / 1000.0)
    }

    /// Net P&L after both the entry and the exit charge.
    pub fn round_trip_pnl(&self) -> f64 {
        self.net_pnl - self.entry_cost
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar.saturating_sub(self.entry_bar)
    }

    pub fn is_winner(&self) -> bool {
        self.net_pnl > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.net_pnl < 0.0
    }
}
