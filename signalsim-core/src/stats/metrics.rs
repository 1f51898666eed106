//! Performance metrics — pure functions over the simulator's outputs.
//!
//! Percent-valued metrics are returned already multiplied by 100.
//! Degenerate inputs (no trades, no days, flat equity) produce 0, never
//! NaN or a panic.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{DailyPnl, Trade};

/// Days per year used to convert a calendar span into years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Annualization factor applied to per-bar return ratios.
///
/// This is the daily-bar constant and is applied whatever the bar
/// frequency; intraday input is not resampled to daily returns first.
pub const SHARPE_PERIODS_PER_YEAR: f64 = 252.0;

/// Standard deviations below this are treated as zero.
const STD_EPSILON: f64 = 1e-15;

// ─── Trade statistics ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub avg_winning_trade: f64,
    pub avg_losing_trade: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub avg_hold_seconds: f64,
    pub avg_hold_minutes: f64,
}

/// Win/loss counts, averages, extremes and mean holding period.
///
/// A trade with exactly zero net P&L is neither a winner nor a loser.
/// Holding periods average over trades with both timestamps; if none have
/// them the holding period is 0.
pub fn trade_stats(trades: &[Trade]) -> TradeStats {
    if trades.is_empty() {
        return TradeStats::default();
    }

    let winners: Vec<f64> = trades.iter().filter(|t| t.is_winner()).map(|t| t.net_pnl).collect();
    let losers: Vec<f64> = trades.iter().filter(|t| t.is_loser()).map(|t| t.net_pnl).collect();
    let holds: Vec<f64> = trades.iter().filter_map(Trade::hold_seconds).collect();

    let best_trade = trades.iter().map(|t| t.net_pnl).fold(f64::NEG_INFINITY, f64::max);
    let worst_trade = trades.iter().map(|t| t.net_pnl).fold(f64::INFINITY, f64::min);
    let avg_hold_seconds = mean(&holds);

    TradeStats {
        total_trades: trades.len(),
        winning_trades: winners.len(),
        losing_trades: losers.len(),
        win_rate: winners.len() as f64 / trades.len() as f64 * 100.0,
        avg_winning_trade: mean(&winners),
        avg_losing_trade: mean(&losers),
        best_trade,
        worst_trade,
        avg_hold_seconds,
        avg_hold_minutes: avg_hold_seconds / 60.0,
    }
}

// ─── Daily statistics ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Number of dates with at least one closed trade.
    pub pnl_days: usize,
    pub winning_days: usize,
    pub losing_days: usize,
    pub best_day_pnl: f64,
    pub worst_day_pnl: f64,
}

pub fn daily_stats(daily: &DailyPnl) -> DailyStats {
    if daily.is_empty() {
        return DailyStats::default();
    }
    DailyStats {
        pnl_days: daily.len(),
        winning_days: daily.values().filter(|&p| p > 0.0).count(),
        losing_days: daily.values().filter(|&p| p < 0.0).count(),
        best_day_pnl: daily.values().fold(f64::NEG_INFINITY, f64::max),
        worst_day_pnl: daily.values().fold(f64::INFINITY, f64::min),
    }
}

// ─── Returns ────────────────────────────────────────────────────────

/// Total return in percent.
pub fn final_returns(final_capital: f64, initial_capital: f64) -> f64 {
    (final_capital - initial_capital) / initial_capital * 100.0
}

/// Calendar span of the run in days, inclusive of both ends.
///
/// Falls back to the number of P&L days when either end is unknown.
pub fn calendar_days(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    pnl_days: usize,
) -> i64 {
    match (start, end) {
        (Some(s), Some(e)) => (e - s).num_days() + 1,
        _ => pnl_days as i64,
    }
}

pub fn years(calendar_days: i64) -> f64 {
    calendar_days as f64 / DAYS_PER_YEAR
}

/// Compound annual growth rate in percent.
///
/// Returns 0 when no time has elapsed. A wiped-out or negative final
/// capital reports -100.
pub fn cagr(final_capital: f64, initial_capital: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    let ratio = final_capital / initial_capital;
    if ratio <= 0.0 {
        return -100.0;
    }
    (ratio.powf(1.0 / years) - 1.0) * 100.0
}

/// Simple (non-compounded) annualized return in percent.
pub fn annualized_returns(final_capital: f64, initial_capital: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    (final_capital / initial_capital - 1.0) / years * 100.0
}

// ─── Risk ───────────────────────────────────────────────────────────

/// Bar-over-bar fractional change of the equity curve.
///
/// The first bar has no prior value. Changes off a zero prior equity are
/// undefined and skipped.
pub fn equity_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Annualized Sharpe ratio of per-bar returns, zero risk-free rate.
///
/// `mean / sample_std × sqrt(252)`. Returns 0 with fewer than two returns
/// or zero deviation.
///
/// The factor assumes daily returns but is applied to whatever bar
/// frequency the input has; intraday bars are not resampled first. Kept
/// for comparability with existing reports.
///
/// A deviation below `1e-15` counts as zero, so returns that are
/// constant up to rounding give 0 rather than a huge ratio. This departs
/// from the bit-exact formula only for such near-constant series.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let std = sample_std_dev(returns);
    if std < STD_EPSILON {
        return 0.0;
    }
    mean(returns) / std * SHARPE_PERIODS_PER_YEAR.sqrt()
}

/// Running maximum and percent drawdown at every point of the curve.
pub fn drawdown_curve(equity: &[f64]) -> Vec<(f64, f64)> {
    let mut peak = f64::NEG_INFINITY;
    equity
        .iter()
        .map(|&eq| {
            peak = peak.max(eq);
            let dd = if peak > 0.0 {
                (eq - peak) / peak * 100.0
            } else {
                0.0
            };
            (peak, dd)
        })
        .collect()
}

/// Most negative percent drawdown; 0 for an empty or never-declining curve.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    drawdown_curve(equity)
        .into_iter()
        .map(|(_, dd)| dd)
        .fold(0.0, f64::min)
}

/// `|CAGR / max_drawdown|`, or 0 when there was no drawdown.
pub fn calmar_ratio(cagr: f64, max_drawdown: f64) -> f64 {
    if max_drawdown < 0.0 {
        (cagr / max_drawdown).abs()
    } else {
        0.0
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample (n − 1) standard deviation; 0 below two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
