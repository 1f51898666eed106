//! Integration tests for the simulator and aggregator.
//!
//! Tests:
//! 1. Concrete scenarios: single long round trip, cost-only drag on a flat price
//! 2. Boundaries: single bar, all-flat signal, untimed series
//! 3. Sizing: half positions, shorts, reversals
//! 4. Degenerate statistics never produce NaN

use chrono::{Duration, NaiveDate, NaiveDateTime};
use signalsim_core::{run, simulate, Bar, PositionDirection, SimConfig, SimError};

const EPS: f64 = 1e-6;

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

/// Helper: one bar per minute starting at 09:15.
fn minute_bars(prices: &[f64], signals: &[f64]) -> Vec<Bar> {
    prices
        .iter()
        .zip(signals)
        .enumerate()
        .map(|(i, (&p, &s))| Bar::new(Some(t0() + Duration::minutes(i as i64)), p, s))
        .collect()
}

// ── Concrete scenarios ──────────────────────────────────────────────

#[test]
fn long_open_then_flat_at_higher_price() {
    let config = SimConfig::new(10_000.0, 0.0003);
    let bars = minute_bars(&[100.0, 110.0], &[1.0, 0.0]);
    let results = run(&bars, &config).unwrap();

    assert_eq!(results.total_trades, 1);
    let trade = &results.trades[0];
    assert_eq!(trade.direction, PositionDirection::Long);
    assert_eq!(trade.entry_price, 100.0);
    assert_eq!(trade.exit_price, 110.0);
    assert!((trade.gross_pnl - 999.7).abs() < EPS);
    assert!((trade.transaction_cost - 2.9991).abs() < EPS);
    assert!((trade.net_pnl - 996.7009).abs() < EPS);
    assert!((results.final_capital - 10_993.7009).abs() < EPS);
    assert!((results.total_transaction_cost - 5.9991).abs() < EPS);
    assert!((results.total_pnl - 993.7009).abs() < EPS);
    assert_eq!(results.winning_trades, 1);
    assert_eq!(results.win_rate, 100.0);
    assert!((results.avg_hold_seconds - 60.0).abs() < EPS);
    assert!((results.avg_hold_minutes - 1.0).abs() < EPS);
    assert_eq!(results.n_days, 1);
    assert_eq!(results.winning_days, 1);
}

#[test]
fn alternating_signals_on_flat_price_only_pay_costs() {
    let config = SimConfig::new(10_000.0, 0.001);
    let bars = minute_bars(&[50.0; 4], &[1.0, -1.0, 1.0, -1.0]);
    let results = run(&bars, &config).unwrap();

    // Three reversals plus the forced close at the end.
    assert_eq!(results.total_trades, 4);
    let mut capital = 10_000.0;
    for trade in &results.trades {
        let entry_cost = capital * config.cost_rate;
        let notional = capital - entry_cost;
        let exit_cost = notional * config.cost_rate;
        assert_eq!(trade.gross_pnl, 0.0);
        assert!((trade.net_pnl + exit_cost).abs() < EPS);
        assert!((trade.entry_cost - entry_cost).abs() < EPS);
        assert!((trade.round_trip_pnl() + entry_cost + exit_cost).abs() < EPS);
        capital = notional - exit_cost;
    }
    assert!((results.final_capital - capital).abs() < EPS);
    assert_eq!(results.losing_trades, 4);
    assert!(results.final_capital < config.initial_capital);
}

// ── Boundaries ──────────────────────────────────────────────────────

#[test]
fn single_bar_opens_and_force_closes() {
    let config = SimConfig::new(10_000.0, 0.0003);
    let bars = minute_bars(&[100.0], &[1.0]);
    let results = run(&bars, &config).unwrap();

    assert_eq!(results.total_trades, 1);
    let trade = &results.trades[0];
    assert_eq!(trade.entry_price, trade.exit_price);
    assert_eq!(trade.entry_bar, 0);
    assert_eq!(trade.exit_bar, 0);
    let entry_cost = 10_000.0 * 0.0003;
    let exit_cost = (10_000.0 - entry_cost) * 0.0003;
    assert_eq!(trade.gross_pnl, 0.0);
    assert!((trade.round_trip_pnl() + entry_cost + exit_cost).abs() < EPS);
    assert!((results.total_pnl + entry_cost + exit_cost).abs() < EPS);
    assert!((results.total_transaction_cost - (entry_cost + exit_cost)).abs() < EPS);
}

#[test]
fn all_flat_signal_never_trades() {
    let config = SimConfig::default();
    let bars = minute_bars(&[100.0, 101.0, 99.0, 105.0], &[0.0; 4]);
    let results = run(&bars, &config).unwrap();

    assert_eq!(results.total_trades, 0);
    assert_eq!(results.final_capital, config.initial_capital);
    assert_eq!(results.total_transaction_cost, 0.0);
    assert_eq!(results.sharpe_ratio, 0.0);
    assert_eq!(results.max_drawdown, 0.0);
    assert_eq!(results.calmar_ratio, 0.0);
    assert_eq!(results.equity_curve.len(), 4);
}

#[test]
fn untimed_series_degrades_duration_metrics() {
    let config = SimConfig::new(10_000.0, 0.0);
    let bars = vec![
        Bar::untimed(100.0, 1.0),
        Bar::untimed(120.0, 1.0),
        Bar::untimed(90.0, 0.0),
    ];
    let results = run(&bars, &config).unwrap();

    assert_eq!(results.total_trades, 1);
    assert_eq!(results.avg_hold_seconds, 0.0);
    assert_eq!(results.n_days, 0);
    assert_eq!(results.cagr, 0.0);
    assert_eq!(results.annualized_returns, 0.0);
    assert_eq!(results.calmar_ratio, 0.0);
    assert!(results.max_drawdown < 0.0);
}

#[test]
fn invalid_bar_reports_index() {
    let config = SimConfig::default();
    let mut bars = minute_bars(&[100.0, 101.0, 102.0], &[1.0, 1.0, 0.0]);
    bars[2].price = -3.0;
    assert_eq!(
        run(&bars, &config).unwrap_err(),
        SimError::NonPositivePrice {
            index: 2,
            price: -3.0
        }
    );
}

#[test]
fn out_of_order_timestamps_rejected() {
    let config = SimConfig::default();
    let mut bars = minute_bars(&[100.0, 101.0, 102.0], &[1.0, 1.0, 0.0]);
    bars.swap(0, 2);
    let err = simulate(&bars, &config).unwrap_err();
    assert!(matches!(err, SimError::NonMonotonicTimestamp { index: 1, .. }));
}

// ── Sizing ──────────────────────────────────────────────────────────

#[test]
fn half_long_scales_pnl() {
    let config = SimConfig::new(10_000.0, 0.0);
    let bars = minute_bars(&[100.0, 110.0], &[0.5, 0.0]);
    let results = run(&bars, &config).unwrap();
    assert_eq!(results.trades[0].size, 0.5);
    assert!((results.trades[0].net_pnl - 500.0).abs() < EPS);
}

#[test]
fn short_profits_on_decline() {
    let config = SimConfig::new(10_000.0, 0.0);
    let bars = minute_bars(&[100.0, 80.0], &[-1.0, 0.0]);
    let results = run(&bars, &config).unwrap();
    assert_eq!(results.trades[0].direction, PositionDirection::Short);
    assert!((results.trades[0].net_pnl - 2_000.0).abs() < EPS);
    assert!((results.final_returns - 20.0).abs() < EPS);
}

#[test]
fn multi_day_daily_stats_and_cagr() {
    let config = SimConfig::new(10_000.0, 0.0);
    let day = |d: u32, h: u32| {
        Some(
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        )
    };
    let bars = vec![
        Bar::new(day(1, 10), 100.0, 1.0),
        Bar::new(day(1, 11), 110.0, 0.0), // +1000 on Jan 1
        Bar::new(day(2, 10), 100.0, 1.0),
        Bar::new(day(2, 11), 95.0, 0.0), // loss on Jan 2
        Bar::new(day(3, 10), 100.0, 0.0),
    ];
    let results = run(&bars, &config).unwrap();

    assert_eq!(results.n_days, 3);
    assert_eq!(results.winning_days, 1);
    assert_eq!(results.losing_days, 1);
    assert!((results.best_day_pnl - 1_000.0).abs() < EPS);
    assert!((results.worst_day_pnl + 550.0).abs() < EPS);

    let years = 3.0 / 365.25;
    let ratio = results.final_capital / results.initial_capital;
    let expected_cagr = (ratio.powf(1.0 / years) - 1.0) * 100.0;
    assert!((results.cagr - expected_cagr).abs() < 1e-6 * expected_cagr.abs().max(1.0));
    let expected_ann = (ratio - 1.0) / years * 100.0;
    assert!((results.annualized_returns - expected_ann).abs() < EPS);
}

#[test]
fn sharpe_matches_formula_on_equity_curve() {
    let config = SimConfig::new(10_000.0, 0.0);
    let bars = minute_bars(&[100.0, 102.0, 101.0, 104.0, 104.0], &[1.0, 1.0, 1.0, 1.0, 0.0]);
    let results = run(&bars, &config).unwrap();

    let equity = results.equity_values();
    let returns: Vec<f64> = equity.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (returns.len() - 1) as f64;
    let expected = mean / var.sqrt() * 252.0_f64.sqrt();
    assert!((results.sharpe_ratio - expected).abs() < 1e-9);
}
