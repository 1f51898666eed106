//! Reporting and export — JSON, CSV, text and Markdown artifacts.
//!
//! - **JSON**: full round-trip serialization of a [`BacktestReport`] with schema versioning
//! - **CSV**: trade ledger and equity curve for external analysis tools
//! - **Text / Markdown**: the fixed-label summary and a human-readable report
//!
//! Persisted manifests carry a `schema_version`; versions newer than this
//! build understands are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use signalsim_core::{EquityPoint, Trade};

use crate::runner::{BacktestReport, SCHEMA_VERSION};
use crate::summary::render_summary;

/// Timestamp layout used in CSV output.
const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestReport` to pretty JSON.
pub fn export_json(report: &BacktestReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BacktestReport to JSON")
}

/// Deserialize a `BacktestReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestReport> {
    let report: BacktestReport =
        serde_json::from_str(json).context("failed to deserialize BacktestReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn fmt_ts(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(CSV_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Export the trade ledger as CSV.
///
/// Columns: entry_bar, entry_time, entry_price, exit_bar, exit_time,
/// exit_price, position_type, size, notional, gross_pnl, entry_cost,
/// transaction_cost, net_pnl, round_trip_pnl, hold_seconds
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "entry_bar",
        "entry_time",
        "entry_price",
        "exit_bar",
        "exit_time",
        "exit_price",
        "position_type",
        "size",
        "notional",
        "gross_pnl",
        "entry_cost",
        "transaction_cost",
        "net_pnl",
        "round_trip_pnl",
        "hold_seconds",
    ])?;

    for t in trades {
        wtr.write_record([
            t.entry_bar.to_string(),
            fmt_ts(t.entry_timestamp),
            format!("{:.6}", t.entry_price),
            t.exit_bar.to_string(),
            fmt_ts(t.exit_timestamp),
            format!("{:.6}", t.exit_price),
            t.direction.to_string(),
            format!("{}", t.size),
            format!("{:.4}", t.notional),
            format!("{:.4}", t.gross_pnl),
            format!("{:.4}", t.entry_cost),
            format!("{:.4}", t.transaction_cost),
            format!("{:.4}", t.net_pnl),
            format!("{:.4}", t.round_trip_pnl()),
            t.hold_seconds().map(|s| format!("{s:.0}")).unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the equity curve as CSV, one row per bar.
pub fn export_equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "bar_index",
        "timestamp",
        "price",
        "signal",
        "position",
        "equity",
        "running_max",
        "drawdown_pct",
    ])?;
    for p in equity_curve {
        let s = &p.snapshot;
        wtr.write_record([
            &s.bar.to_string(),
            &fmt_ts(s.timestamp),
            &format!("{:.6}", s.price),
            &format!("{}", s.signal),
            &format!("{}", s.position),
            &format!("{:.2}", s.equity),
            &format!("{:.2}", p.running_max),
            &format!("{:.4}", p.drawdown_pct),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single backtest run.
///
/// Creates a directory named `run_{id prefix}_{timestamp}/` under
/// `output_dir` containing:
/// - `manifest.json` — the full `BacktestReport`
/// - `trades.csv` — trade ledger
/// - `equity_curve.csv` — bar-by-bar equity and drawdown
/// - `summary.txt` — the fixed-label summary block
/// - `report.md` — Markdown report
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &BacktestReport, output_dir: &Path) -> Result<PathBuf> {
    let short_id: String = report.run_id.chars().take(12).collect();
    let dirname = format!(
        "run_{}_{}",
        short_id,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let write = |name: &str, content: &str| -> Result<()> {
        let path = run_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))
    };

    write("manifest.json", &export_json(report)?)?;
    write("trades.csv", &export_trades_csv(&report.results.trades)?)?;
    write(
        "equity_curve.csv",
        &export_equity_csv(&report.results.equity_curve)?,
    )?;
    write("summary.txt", &render_summary(&report.results))?;
    write("report.md", &generate_report(report))?;

    log::info!("artifacts written to {}", run_dir.display());
    Ok(run_dir)
}

/// Load a `BacktestReport` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<BacktestReport> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report for a single backtest run.
pub fn generate_report(report: &BacktestReport) -> String {
    let r = &report.results;
    let mut md = String::with_capacity(2048);

    md.push_str("# Backtest Report\n\n");

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Run ID | {} |\n", report.run_id));
    if let Some(path) = &report.data_path {
        md.push_str(&format!("| Data | {} |\n", path));
    }
    md.push_str(&format!("| Bars | {} |\n", report.bar_count));
    md.push_str(&format!("| Dataset Hash | {} |\n", report.dataset_hash));
    md.push_str(&format!(
        "| Initial Capital | {:.2} |\n",
        report.config.initial_capital
    ));
    md.push_str(&format!(
        "| Cost Rate | {:.4}% |\n",
        report.config.cost_rate * 100.0
    ));
    md.push('\n');

    md.push_str("## Performance\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Final Capital | {:.2} |\n", r.final_capital));
    md.push_str(&format!("| Total PnL | {:.2} |\n", r.total_pnl));
    md.push_str(&format!("| Final Returns | {:.2}% |\n", r.final_returns));
    md.push_str(&format!("| CAGR | {:.4}% |\n", r.cagr));
    md.push_str(&format!("| Sharpe Ratio | {:.4} |\n", r.sharpe_ratio));
    md.push_str(&format!("| Calmar Ratio | {:.4} |\n", r.calmar_ratio));
    md.push_str(&format!("| Max Drawdown | {:.4}% |\n", r.max_drawdown));
    md.push_str(&format!(
        "| Transaction Cost | {:.2} |\n",
        r.total_transaction_cost
    ));
    md.push('\n');

    md.push_str("## Trades\n\n");
    if r.trades.is_empty() {
        md.push_str("No trades.\n");
        return md;
    }
    md.push_str(&format!(
        "{} trades, {} winners, {} losers, win rate {:.2}%.\n\n",
        r.total_trades, r.winning_trades, r.losing_trades, r.win_rate
    ));
    md.push_str("| # | Side | Size | Entry | Exit | Net PnL |\n");
    md.push_str("| --- | --- | --- | --- | --- | --- |\n");
    for (i, t) in r.trades.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {} | {} | {:.2} | {:.2} | {:.2} |\n",
            i + 1,
            t.direction,
            t.size,
            t.entry_price,
            t.exit_price,
            t.net_pnl
        ));
    }
    md
}
