//! Single-pass simulator: signal stream → positions, trades, equity curve.
//!
//! Per bar, in order:
//! 1. Mark to market and record an equity snapshot.
//! 2. Ask the target policy for the desired position.
//! 3. On a change: close the held position (if any), then open the target
//!    (if non-zero).
//!
//! A position still open after the last bar is closed against that bar.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::domain::{validate_bars, Bar, DailyPnl, EquitySnapshot, PositionState, Trade};
use crate::error::SimError;

use super::target::{SignalTarget, TargetPolicy};

/// Everything the simulator produces for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub final_capital: f64,
    pub trades: Vec<Trade>,
    pub daily_pnl: DailyPnl,
    /// One snapshot per input bar.
    pub equity_curve: Vec<EquitySnapshot>,
    /// Sum of every entry and exit charge.
    pub total_transaction_cost: f64,
    /// Earliest timestamp present in the input.
    pub start_ts: Option<NaiveDateTime>,
    /// Latest timestamp present in the input.
    pub end_ts: Option<NaiveDateTime>,
}

/// Run the simulator with the signal as the target position.
pub fn simulate(bars: &[Bar], config: &SimConfig) -> Result<SimulationOutput, SimError> {
    simulate_with(bars, config, &SignalTarget)
}

/// Run the simulator with an explicit target policy.
///
/// Fails fast on invalid configuration or input; no partial output is
/// produced.
pub fn simulate_with(
    bars: &[Bar],
    config: &SimConfig,
    policy: &dyn TargetPolicy,
) -> Result<SimulationOutput, SimError> {
    config.validate()?;
    validate_bars(bars)?;

    let cost_rate = config.cost_rate;
    let mut state = PositionState::flat(config.initial_capital);
    let mut trades: Vec<Trade> = Vec::new();
    let mut daily_pnl = DailyPnl::new();
    let mut equity_curve = Vec::with_capacity(bars.len());
    let mut total_cost = 0.0;

    for (t, bar) in bars.iter().enumerate() {
        // ─── Mark to market ───
        equity_curve.push(EquitySnapshot {
            bar: t,
            timestamp: bar.timestamp,
            equity: state.equity(bar.price),
            price: bar.price,
            signal: bar.signal,
            position: state.size(),
        });

        // ─── Transition ───
        let target = policy.target(bar, state.size());
        if !target.is_finite() {
            return Err(SimError::NonFiniteTarget { index: t, target });
        }
        if target == state.size() {
            continue;
        }

        if let Some(trade) = state.close(t, bar, cost_rate) {
            total_cost += trade.transaction_cost;
            record_close(&mut trades, &mut daily_pnl, trade);
        }

        if target != 0.0 {
            let entry_cost = state.open(target, t, bar, cost_rate);
            total_cost += entry_cost;
            log::debug!(
                "bar {t}: open {target} at {:.4}, notional {:.2}, entry cost {:.4}",
                bar.price,
                state.notional(),
                entry_cost
            );
        }
    }

    // ─── Forced close ───
    let last_index = bars.len() - 1;
    if let Some(trade) = state.close(last_index, &bars[last_index], cost_rate) {
        log::debug!("bar {last_index}: forced close of position left open at end of series");
        total_cost += trade.transaction_cost;
        record_close(&mut trades, &mut daily_pnl, trade);
    }

    let start_ts = bars.iter().filter_map(|b| b.timestamp).min();
    let end_ts = bars.iter().filter_map(|b| b.timestamp).max();

    log::info!(
        "simulated {} bars with '{}' policy: {} trades, final capital {:.2}",
        bars.len(),
        policy.name(),
        trades.len(),
        state.capital()
    );

    Ok(SimulationOutput {
        final_capital: state.capital(),
        trades,
        daily_pnl,
        equity_curve,
        total_transaction_cost: total_cost,
        start_ts,
        end_ts,
    })
}

fn record_close(trades: &mut Vec<Trade>, daily_pnl: &mut DailyPnl, trade: Trade) {
    log::debug!(
        "bar {}: close {} {} at {:.4}, net pnl {:.4}",
        trade.exit_bar,
        trade.direction,
        trade.size,
        trade.exit_price,
        trade.net_pnl
    );
    if let Some(ts) = trade.exit_timestamp {
        daily_pnl.record(ts.date(), trade.net_pnl);
    }
    trades.push(trade);
}
