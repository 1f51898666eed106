//! Statistics aggregation: simulator output in, [`Results`] out.
//!
//! `aggregate` is a pure function; it never fails, degenerate inputs map
//! to neutral (zero) metrics.

pub mod metrics;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::domain::{EquityPoint, Trade};
use crate::engine::SimulationOutput;

pub use metrics::{DailyStats, TradeStats};

/// Final results of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    // ── Capital ──
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_pnl: f64,
    pub total_transaction_cost: f64,

    // ── Returns / risk (percent unless a ratio) ──
    pub final_returns: f64,
    pub cagr: f64,
    pub annualized_returns: f64,
    pub sharpe_ratio: f64,
    pub calmar_ratio: f64,
    pub max_drawdown: f64,

    // ── Days ──
    /// Calendar span in days (or P&L day count when untimed).
    pub n_days: i64,
    pub winning_days: usize,
    pub losing_days: usize,
    pub best_day_pnl: f64,
    pub worst_day_pnl: f64,

    // ── Trades ──
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub avg_winning_trade: f64,
    pub avg_losing_trade: f64,
    pub avg_hold_seconds: f64,
    pub avg_hold_minutes: f64,
    pub best_trade: f64,
    pub worst_trade: f64,

    // ── Ledgers ──
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Results {
    /// Equity values of the curve, in bar order.
    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|p| p.snapshot.equity).collect()
    }
}

/// Compute every summary metric from a simulation run.
pub fn aggregate(output: &SimulationOutput, config: &SimConfig) -> Results {
    let initial = config.initial_capital;
    let final_capital = output.final_capital;

    let trade = metrics::trade_stats(&output.trades);
    let daily = metrics::daily_stats(&output.daily_pnl);

    let n_days = metrics::calendar_days(output.start_ts, output.end_ts, daily.pnl_days);
    let years = metrics::years(n_days);
    let cagr = metrics::cagr(final_capital, initial, years);

    let equity: Vec<f64> = output.equity_curve.iter().map(|s| s.equity).collect();
    let returns = metrics::equity_returns(&equity);
    if intraday_returns(output, returns.len(), n_days) {
        log::debug!(
            "sharpe: {} intraday returns over {n_days} days annualised as daily",
            returns.len()
        );
    }
    let drawdowns = metrics::drawdown_curve(&equity);
    let max_drawdown = drawdowns.iter().map(|&(_, dd)| dd).fold(0.0, f64::min);

    let equity_curve = output
        .equity_curve
        .iter()
        .zip(&drawdowns)
        .map(|(snapshot, &(running_max, drawdown_pct))| EquityPoint {
            snapshot: *snapshot,
            running_max,
            drawdown_pct,
        })
        .collect();

    Results {
        initial_capital: initial,
        final_capital,
        total_pnl: final_capital - initial,
        total_transaction_cost: output.total_transaction_cost,
        final_returns: metrics::final_returns(final_capital, initial),
        cagr,
        annualized_returns: metrics::annualized_returns(final_capital, initial, years),
        sharpe_ratio: metrics::sharpe_ratio(&returns),
        calmar_ratio: metrics::calmar_ratio(cagr, max_drawdown),
        max_drawdown,
        n_days,
        winning_days: daily.winning_days,
        losing_days: daily.losing_days,
        best_day_pnl: daily.best_day_pnl,
        worst_day_pnl: daily.worst_day_pnl,
        total_trades: trade.total_trades,
        winning_trades: trade.winning_trades,
        losing_trades: trade.losing_trades,
        win_rate: trade.win_rate,
        avg_winning_trade: trade.avg_winning_trade,
        avg_losing_trade: trade.avg_losing_trade,
        avg_hold_seconds: trade.avg_hold_seconds,
        avg_hold_minutes: trade.avg_hold_minutes,
        best_trade: trade.best_trade,
        worst_trade: trade.worst_trade,
        trades: output.trades.clone(),
        equity_curve,
    }
}

/// True when timestamped bars yield more returns than calendar days, i.e.
/// the daily Sharpe factor is being applied to intraday returns.
fn intraday_returns(output: &SimulationOutput, n_returns: usize, n_days: i64) -> bool {
    output.start_ts.is_some() && n_returns as i64 > n_days.max(1)
}
