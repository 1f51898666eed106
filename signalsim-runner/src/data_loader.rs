//! CSV loading: raw rows → validated-shape `Vec<Bar>`.
//!
//! Column names are configurable. Timestamps that cannot be parsed become
//! `None` instead of failing the load; prices and signals must parse.
//! When a timestamp column exists, rows are sorted ascending by timestamp
//! (stable, missing timestamps last) before they reach the simulator.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use signalsim_core::Bar;
use thiserror::Error;

/// Primary timestamp layout, e.g. `01-01-2024 09:15`.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Layouts tried, in order, when the primary one does not match.
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{column}' not found in header")]
    MissingColumn { column: String },

    #[error("row {row}: cannot parse {column} value '{value}' as a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },
}

/// Names of the input columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub timestamp: String,
    pub price: String,
    pub signal: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            timestamp: "datetime".into(),
            price: "close".into(),
            signal: "signal".into(),
        }
    }
}

/// Parse a timestamp, trying the primary layout then the fallbacks.
///
/// Date-only values are taken at midnight. Returns `None` for empty or
/// unrecognised input.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    std::iter::once(TIMESTAMP_FORMAT)
        .chain(FALLBACK_DATETIME_FORMATS.iter().copied())
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Load bars from a CSV file.
pub fn load_csv(path: &Path, columns: &ColumnNames) -> Result<Vec<Bar>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = load_csv_reader(file, columns)?;
    log::info!("loaded {} bars from {}", bars.len(), path.display());
    Ok(bars)
}

/// Load bars from any CSV source with a header row.
pub fn load_csv_reader<R: Read>(reader: R, columns: &ColumnNames) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h == name);
    let price_idx = find(&columns.price).ok_or_else(|| LoadError::MissingColumn {
        column: columns.price.clone(),
    })?;
    let signal_idx = find(&columns.signal).ok_or_else(|| LoadError::MissingColumn {
        column: columns.signal.clone(),
    })?;
    let ts_idx = find(&columns.timestamp);
    if ts_idx.is_none() {
        log::warn!(
            "timestamp column '{}' not found; duration metrics will be zero",
            columns.timestamp
        );
    }

    let mut bars = Vec::new();
    let mut unparsed_timestamps = 0usize;

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // 1-based, counting the header line.
        let row = i + 2;

        let price = parse_number(&record, price_idx, row, &columns.price)?;
        let signal = parse_number(&record, signal_idx, row, &columns.signal)?;
        let timestamp = ts_idx.and_then(|idx| {
            let parsed = record.get(idx).and_then(parse_timestamp);
            if parsed.is_none() {
                unparsed_timestamps += 1;
            }
            parsed
        });

        bars.push(Bar::new(timestamp, price, signal));
    }

    if unparsed_timestamps > 0 {
        log::warn!("{unparsed_timestamps} rows have missing or unparseable timestamps");
    }

    if ts_idx.is_some() {
        bars.sort_by_key(|b| (b.timestamp.is_none(), b.timestamp));
    }

    Ok(bars)
}

fn parse_number(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    column: &str,
) -> Result<f64, LoadError> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>().map_err(|_| LoadError::Parse {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Deterministic BLAKE3 hash over all bar values, in order.
pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        match bar.timestamp {
            Some(ts) => hasher.update(ts.and_utc().timestamp().to_le_bytes().as_slice()),
            None => hasher.update(b"-"),
        };
        hasher.update(&bar.price.to_le_bytes());
        hasher.update(&bar.signal.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
