//! Error taxonomy for the simulation core.
//!
//! Only invalid input and invalid configuration are errors. Missing
//! timestamps and degenerate statistics are absorbed into neutral values.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid input: bar sequence is empty")]
    EmptyInput,

    #[error("invalid input: bar {index} has non-positive or non-finite price {price}")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("invalid input: bar {index} has non-finite signal {signal}")]
    NonFiniteSignal { index: usize, signal: f64 },

    #[error("invalid input: bar {index} timestamp {current} precedes previous timestamp {previous}")]
    NonMonotonicTimestamp {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("invalid target: policy returned non-finite target {target} at bar {index}")]
    NonFiniteTarget { index: usize, target: f64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl SimError {
    /// Index of the offending bar, if the error is tied to one.
    pub fn bar_index(&self) -> Option<usize> {
        match self {
            SimError::NonPositivePrice { index, .. }
            | SimError::NonFiniteSignal { index, .. }
            | SimError::NonMonotonicTimestamp { index, .. }
            | SimError::NonFiniteTarget { index, .. } => Some(*index),
            SimError::EmptyInput | SimError::InvalidConfig(_) => None,
        }
    }
}
