//! Bar — one observation of the input series.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// A single (timestamp, price, signal) observation.
///
/// The signal is both direction and target size: `1.0` is full long,
/// `-1.0` full short, `0.5` half long, `0.0` flat. The timestamp is only
/// used for day bucketing and durations, so a bar without one is still
/// tradable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: Option<NaiveDateTime>,
    pub price: f64,
    pub signal: f64,
}

impl Bar {
    pub fn new(timestamp: Option<NaiveDateTime>, price: f64, signal: f64) -> Self {
        Self {
            timestamp,
            price,
            signal,
        }
    }

    /// Bar with no timestamp.
    pub fn untimed(price: f64, signal: f64) -> Self {
        Self::new(None, price, signal)
    }

    /// Calendar date of the bar, if timestamped.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }

    /// Reject non-positive or non-finite prices and non-finite signals.
    pub fn validate(&self, index: usize) -> Result<(), SimError> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(SimError::NonPositivePrice {
                index,
                price: self.price,
            });
        }
        if !self.signal.is_finite() {
            return Err(SimError::NonFiniteSignal {
                index,
                signal: self.signal,
            });
        }
        Ok(())
    }
}

/// Validate a full series once, before simulation.
///
/// The series must be non-empty, every bar must be valid, and the
/// timestamps that are present must be non-decreasing. Bars without a
/// timestamp do not take part in the ordering check.
pub fn validate_bars(bars: &[Bar]) -> Result<(), SimError> {
    if bars.is_empty() {
        return Err(SimError::EmptyInput);
    }

    let mut previous: Option<NaiveDateTime> = None;
    for (index, bar) in bars.iter().enumerate() {
        bar.validate(index)?;
        if let Some(current) = bar.timestamp {
            if let Some(prev) = previous {
                if current < prev {
                    return Err(SimError::NonMonotonicTimestamp {
                        index,
                        previous: prev,
                        current,
                    });
                }
            }
            previous = Some(current);
        }
    }
    Ok(())
}
