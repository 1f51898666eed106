//! Target position policy.
//!
//! The simulator asks a [`TargetPolicy`] for the desired signed position at
//! each bar. The default [`SignalTarget`] passes the signal through
//! unchanged, so the signal is both direction and size.

use crate::domain::Bar;

/// Decides the desired signed position for a bar.
///
/// Policies see the bar and the position currently held, never capital or
/// trade history.
pub trait TargetPolicy: Send + Sync {
    fn target(&self, bar: &Bar, current: f64) -> f64;

    /// Policy name for logging.
    fn name(&self) -> &str;
}

/// The bar's signal is the target position.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalTarget;

impl TargetPolicy for SignalTarget {
    fn target(&self, bar: &Bar, _current: f64) -> f64 {
        bar.signal
    }

    fn name(&self) -> &str {
        "signal"
    }
}
