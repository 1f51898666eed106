//! Simulation engine: the bar loop and the target-position seam.

pub mod simulator;
pub mod target;

pub use simulator::{simulate, simulate_with, SimulationOutput};
pub use target::{SignalTarget, TargetPolicy};
