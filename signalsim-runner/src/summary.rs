//! Plain-text summary block for a finished run.

use std::fmt::Write;

use signalsim_core::Results;

const RULE_WIDTH: usize = 50;
const LABEL_WIDTH: usize = 30;

/// Render the fixed-label summary, fields in reporting order.
pub fn render_summary(results: &Results) -> String {
    let r = results;
    let rows: [(&str, String); 25] = [
        ("Initial Capital", format!("{:.2}", r.initial_capital)),
        ("Final Capital", format!("{:.2}", r.final_capital)),
        ("Total PnL", format!("{:.2}", r.total_pnl)),
        ("Total Transaction Cost", format!("{:.2}", r.total_transaction_cost)),
        ("Final Returns", format!("{:.2}%", r.final_returns)),
        ("CAGR", format!("{:.4}%", r.cagr)),
        ("Annualized Returns", format!("{:.4}%", r.annualized_returns)),
        ("Sharpe Ratio", format!("{:.4}", r.sharpe_ratio)),
        ("Calmar Ratio", format!("{:.4}", r.calmar_ratio)),
        ("Maximum Drawdown", format!("{:.4}%", r.max_drawdown)),
        ("No. of Days", r.n_days.to_string()),
        ("Winning Days", r.winning_days.to_string()),
        ("Losing Days", r.losing_days.to_string()),
        ("Best Day PnL", format!("{:.2}", r.best_day_pnl)),
        ("Worst Day PnL", format!("{:.2}", r.worst_day_pnl)),
        ("Total Trades", r.total_trades.to_string()),
        ("Winning Trades", r.winning_trades.to_string()),
        ("Losing Trades", r.losing_trades.to_string()),
        ("Win Rate (%)", format!("{:.2}%", r.win_rate)),
        ("Average Winning Trade", format!("{:.4}", r.avg_winning_trade)),
        ("Average Losing Trade", format!("{:.4}", r.avg_losing_trade)),
        ("Best Trade", format!("{:.4}", r.best_trade)),
        ("Worst Trade", format!("{:.4}", r.worst_trade)),
        ("Average Hold Period (seconds)", format!("{:.2}", r.avg_hold_seconds)),
        ("Average Hold Period (minutes)", format!("{:.2}", r.avg_hold_minutes)),
    ];

    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::with_capacity(1536);
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "=== Backtest Summary ===");
    for (label, value) in &rows {
        let _ = writeln!(out, "{:<width$}: {}", label, value, width = LABEL_WIDTH);
    }
    let _ = writeln!(out, "{rule}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use signalsim_core::{Bar, SimConfig};

    fn results() -> Results {
        let bars = vec![Bar::untimed(100.0, 1.0), Bar::untimed(110.0, 0.0)];
        signalsim_core::run(&bars, &SimConfig::new(10_000.0, 0.0003)).unwrap()
    }

    #[test]
    fn has_rules_and_title() {
        let text = render_summary(&results());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1], "=== Backtest Summary ===");
        assert_eq!(*lines.last().unwrap(), "=".repeat(50));
    }

    #[test]
    fn formats_known_values() {
        let text = render_summary(&results());
        assert!(text.contains("Initial Capital               : 10000.00\n"));
        assert!(text.contains("Final Capital                 : 10993.70\n"));
        assert!(text.contains("Total Transaction Cost        : 6.00\n"));
        assert!(text.contains("Total Trades                  : 1\n"));
        assert!(text.contains("Win Rate (%)                  : 100.00%\n"));
    }

    #[test]
    fn labels_are_aligned() {
        let text = render_summary(&results());
        for line in text.lines().skip(2).filter(|l| !l.starts_with('=')) {
            assert_eq!(line.find(": "), Some(LABEL_WIDTH), "misaligned: {line}");
        }
    }
}
