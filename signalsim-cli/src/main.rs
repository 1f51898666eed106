//! signalsim CLI — run, sample, and sweep commands.
//!
//! Commands:
//! - `run` — backtest a CSV of (datetime, price, signal) rows, print the summary, save artifacts
//! - `sample` — write a deterministic demo CSV
//! - `sweep` — backtest one CSV across several cost rates in parallel
//!
//! Log level follows `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use signalsim_core::SimConfig;
use signalsim_runner::data_loader::{load_csv, parse_timestamp};
use signalsim_runner::sweep::best_by_final_capital;
use signalsim_runner::{
    generate_sample_bars, render_summary, run_backtest, save_artifacts, sweep_cost_rates,
    write_sample_csv, RunConfig,
};

#[derive(Parser)]
#[command(
    name = "signalsim",
    about = "signalsim CLI — single-asset signal backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest a CSV file, print the summary, and save artifacts.
    Run {
        /// Path to a TOML config file. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input CSV (required without --config).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Starting capital.
        #[arg(long)]
        capital: Option<f64>,

        /// Cost per side as a fraction of notional (0.0003 = 0.03%).
        #[arg(long)]
        cost_rate: Option<f64>,

        /// Timestamp column name.
        #[arg(long)]
        datetime_col: Option<String>,

        /// Price column name.
        #[arg(long)]
        price_col: Option<String>,

        /// Signal column name.
        #[arg(long)]
        signal_col: Option<String>,

        /// Output directory for artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the summary only; write nothing.
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Write a deterministic sample CSV of one-minute bars.
    Sample {
        /// Output CSV path.
        #[arg(long, default_value = "data/sample.csv")]
        out: PathBuf,

        /// Number of bars.
        #[arg(long, default_value_t = 1000)]
        bars: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First bar timestamp (DD-MM-YYYY HH:MM).
        #[arg(long, default_value = "01-01-2024 09:15")]
        start: String,
    },
    /// Backtest one CSV across several cost rates.
    Sweep {
        /// Input CSV with default column names.
        #[arg(long)]
        data: PathBuf,

        /// Starting capital.
        #[arg(long, default_value_t = signalsim_core::config::DEFAULT_INITIAL_CAPITAL)]
        capital: f64,

        /// Cost rates to test.
        #[arg(long, value_delimiter = ',', default_value = "0,0.0001,0.0003,0.001")]
        cost_rates: Vec<f64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            capital,
            cost_rate,
            datetime_col,
            price_col,
            signal_col,
            output_dir,
            no_save,
        } => {
            let mut run_config = match (config, data) {
                (Some(path), data) => {
                    let mut c = RunConfig::from_file(&path)?;
                    if let Some(data) = data {
                        c.data.path = data;
                    }
                    c
                }
                (None, Some(data)) => RunConfig::for_data(data),
                (None, None) => bail!("one of --config or --data is required"),
            };
            if let Some(capital) = capital {
                run_config.simulation.initial_capital = capital;
            }
            if let Some(rate) = cost_rate {
                run_config.simulation.cost_rate = rate;
            }
            if let Some(col) = datetime_col {
                run_config.data.columns.timestamp = col;
            }
            if let Some(col) = price_col {
                run_config.data.columns.price = col;
            }
            if let Some(col) = signal_col {
                run_config.data.columns.signal = col;
            }
            if let Some(dir) = output_dir {
                run_config.output.dir = dir;
            }
            run_cmd(&run_config, !no_save)
        }
        Commands::Sample {
            out,
            bars,
            seed,
            start,
        } => sample_cmd(out, bars, seed, &start),
        Commands::Sweep {
            data,
            capital,
            cost_rates,
        } => sweep_cmd(data, capital, &cost_rates),
    }
}

fn run_cmd(config: &RunConfig, save: bool) -> Result<()> {
    config.validate()?;
    log::debug!("run config: {config:?}");
    let report = run_backtest(config)?;

    print!("{}", render_summary(&report.results));

    if save {
        let run_dir = save_artifacts(&report, &config.output.dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn sample_cmd(out: PathBuf, n: usize, seed: u64, start: &str) -> Result<()> {
    let start: NaiveDateTime =
        parse_timestamp(start).with_context(|| format!("invalid --start '{start}'"))?;
    let bars = generate_sample_bars(n, seed, start);
    write_sample_csv(&out, &bars)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("Wrote {} bars to {}", bars.len(), out.display());
    Ok(())
}

fn sweep_cmd(data: PathBuf, capital: f64, cost_rates: &[f64]) -> Result<()> {
    if cost_rates.is_empty() {
        bail!("--cost-rates must list at least one value");
    }
    let bars = load_csv(&data, &Default::default())?;
    let base = SimConfig::new(capital, signalsim_core::config::DEFAULT_COST_RATE);
    let points = sweep_cost_rates(&bars, &base, cost_rates)?;

    println!(
        "{:>10}  {:>14}  {:>10}  {:>8}  {:>10}  {:>7}",
        "cost_rate", "final_capital", "return_%", "sharpe", "max_dd_%", "trades"
    );
    for p in &points {
        let r = &p.report.results;
        println!(
            "{:>10.5}  {:>14.2}  {:>10.2}  {:>8.4}  {:>10.4}  {:>7}",
            p.cost_rate,
            r.final_capital,
            r.final_returns,
            r.sharpe_ratio,
            r.max_drawdown,
            r.total_trades
        );
    }
    if let Some(best) = best_by_final_capital(&points) {
        println!("Best cost rate: {}", best.cost_rate);
    }
    Ok(())
}
