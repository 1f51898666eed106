//! Deterministic sample data for demos and tests.
//!
//! One-minute bars following a geometric random walk, with a repeating
//! long / half-long / flat / short signal schedule.

use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use signalsim_core::Bar;

use crate::data_loader::{ColumnNames, TIMESTAMP_FORMAT};

pub const SAMPLE_START_PRICE: f64 = 21_500.0;
/// Per-bar return standard deviation (0.1%).
pub const SAMPLE_VOLATILITY: f64 = 0.001;
/// Bars with a zero signal before the schedule starts.
const WARMUP_BARS: usize = 50;

/// Signal for bar `i` of the demo schedule.
pub fn sample_signal(i: usize) -> f64 {
    if i < WARMUP_BARS {
        return 0.0;
    }
    match i % 100 {
        0..=39 => 1.0,
        40..=49 => 0.5,
        50..=69 => 0.0,
        _ => -1.0,
    }
}

/// Generate `n` one-minute bars starting at `start`.
///
/// Same `seed` → identical bars.
pub fn generate_sample_bars(n: usize, seed: u64, start: NaiveDateTime) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = SAMPLE_START_PRICE;
    (0..n)
        .map(|i| {
            let z: f64 = StandardNormal.sample(&mut rng);
            price *= 1.0 + z * SAMPLE_VOLATILITY;
            let ts = start + Duration::minutes(i as i64);
            Bar::new(Some(ts), price, sample_signal(i))
        })
        .collect()
}

/// Write bars as CSV in the default column layout and timestamp format.
pub fn write_sample_csv(path: &Path, bars: &[Bar]) -> Result<(), csv::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let columns = ColumnNames::default();
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([&columns.timestamp, &columns.price, &columns.signal])?;
    for bar in bars {
        let ts = bar
            .timestamp
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();
        wtr.write_record([ts, format!("{}", bar.price), format!("{}", bar.signal)])?;
    }
    wtr.flush()?;
    log::info!("wrote {} sample bars to {}", bars.len(), path.display());
    Ok(())
}
