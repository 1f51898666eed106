//! Position state — the single mutable piece of a simulation run.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::bar::Bar;
use super::trade::Trade;

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionDirection {
    Long,
    Short,
}

impl PositionDirection {
    /// Direction implied by a signed size; `None` when flat.
    pub fn from_size(size: f64) -> Option<Self> {
        if size > 0.0 {
            Some(Self::Long)
        } else if size < 0.0 {
            Some(Self::Short)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
        }
    }
}

impl fmt::Display for PositionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current position and capital.
///
/// Capital moves only when a position opens (entry cost) or closes
/// (realized P&L minus exit cost). The entry cost is charged on
/// `capital × |size|` and the position is then sized off the remaining
/// capital, so the notional is `capital_after_entry_cost × |size|`. It stays
/// fixed while the position is open; unrealized P&L never feeds back into
/// sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionState {
    size: f64,
    entry_price: f64,
    entry_bar: usize,
    entry_timestamp: Option<NaiveDateTime>,
    entry_cost: f64,
    capital: f64,
    notional: f64,
}

impl PositionState {
    pub fn flat(capital: f64) -> Self {
        Self {
            size: 0.0,
            entry_price: 0.0,
            entry_bar: 0,
            entry_timestamp: None,
            entry_cost: 0.0,
            capital,
            notional: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.size == 0.0
    }

    /// Signed position size (the signal value it was opened at).
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn entry_timestamp(&self) -> Option<NaiveDateTime> {
        self.entry_timestamp
    }

    pub fn direction(&self) -> Option<PositionDirection> {
        PositionDirection::from_size(self.size)
    }

    /// Mark-to-market P&L of the open position at `price`.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.direction() {
            Some(PositionDirection::Long) => self.notional * (price / self.entry_price - 1.0),
            Some(PositionDirection::Short) => self.notional * (1.0 - price / self.entry_price),
            None => 0.0,
        }
    }

    /// Capital plus unrealized P&L.
    pub fn equity(&self, price: f64) -> f64 {
        if self.is_flat() {
            self.capital
        } else {
            self.capital + self.unrealized_pnl(price)
        }
    }

    /// Open a position of signed size `target` at `bar`.
    ///
    /// Must be called while flat. Returns the entry cost charged to capital.
    pub fn open(&mut self, target: f64, bar_index: usize, bar: &Bar, cost_rate: f64) -> f64 {
        debug_assert!(self.is_flat(), "open called with a position already held");
        let entry_cost = self.capital * target.abs() * cost_rate;
        self.capital -= entry_cost;

        self.size = target;
        self.notional = self.capital * target.abs();
        self.entry_price = bar.price;
        self.entry_bar = bar_index;
        self.entry_timestamp = bar.timestamp;
        self.entry_cost = entry_cost;
        entry_cost
    }

    /// Close the open position at `bar`, realizing P&L and the exit cost.
    ///
    /// Returns `None` when already flat. The state is flat afterwards.
    pub fn close(&mut self, bar_index: usize, bar: &Bar, cost_rate: f64) -> Option<Trade> {
        let direction = self.direction()?;
        let gross_pnl = self.unrealized_pnl(bar.price);
        let exit_cost = self.notional.abs() * cost_rate;
        let net_pnl = gross_pnl - exit_cost;
        self.capital += net_pnl;

        let trade = Trade {
            entry_bar: self.entry_bar,
            entry_timestamp: self.entry_timestamp,
            entry_price: self.entry_price,
            exit_bar: bar_index,
            exit_timestamp: bar.timestamp,
            exit_price: bar.price,
            direction,
            size: self.size.abs(),
            notional: self.notional,
            entry_cost: self.entry_cost,
            gross_pnl,
            transaction_cost: exit_cost,
            net_pnl,
        };

        *self = Self::flat(self.capital);
        Some(trade)
    }
}
